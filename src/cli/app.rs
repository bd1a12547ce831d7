//! Main CLI application

use crate::config::{
    environment_overrides, parse_config_auto, parse_config_file, validate_config, Config,
};
use crate::error::{OrdoError, Result};
use crate::runner::{
    check, resolve, resolve_default, CancelToken, CommandRunner, DryRunRunner, Environment,
    Executor, Plan, Platform, Registry, Report, ShellConfig, ShellRunner,
};
use crate::ui::{Reporter, Verbosity};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A loaded declaration, ready to resolve and run recipes
pub struct App {
    registry: Registry,
    shell: ShellConfig,
    environment: Environment,
    config_path: Option<PathBuf>,
}

impl App {
    /// Load the declaration file, discovering it when no path is given
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let (config, config_path) = match path {
            Some(path) => (parse_config_file(&path)?, path),
            None => parse_config_auto()?,
        };
        debug!(path = %config_path.display(), "loaded ordo file");

        App::from_config(config, Some(&config_path), Environment::current()?)
    }

    /// Build an app from a parsed declaration.
    ///
    /// `environment` supplies the working directory; declared variables are
    /// added to it.
    pub fn from_config(
        config: Config,
        config_path: Option<&Path>,
        environment: Environment,
    ) -> Result<Self> {
        validate_config(&config)?;

        let mut vars = environment.vars.clone();
        vars.extend(environment_overrides(&config, config_path)?);
        let environment = environment.with_vars(vars);

        let shell = ShellConfig::select(&config.shell, Platform::current());
        let registry = Registry::from_config(config)?;

        Ok(App {
            registry,
            shell,
            environment,
            config_path: config_path.map(Path::to_path_buf),
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn shell(&self) -> &ShellConfig {
        &self.shell
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Resolve a recipe (or the default one) and bind its arguments
    pub fn plan(&self, recipe: Option<&str>, args: &[String]) -> Result<Plan> {
        let mut plan = match recipe {
            Some(name) => resolve(&self.registry, name)?,
            None => resolve_default(&self.registry)?,
        };
        plan.bind_arguments(&self.registry, args)?;
        Ok(plan)
    }

    /// Resolve, then execute with the given runner
    pub fn execute<R: CommandRunner>(
        &self,
        runner: R,
        recipe: Option<&str>,
        args: &[String],
        reporter: Reporter,
        cancel: CancelToken,
    ) -> Result<Report> {
        let plan = self.plan(recipe, args)?;
        reporter.detail(&format!("Plan: {}", plan.recipes().join(", ")));

        let mut executor = Executor::new(runner, self.shell.clone(), self.environment.clone())
            .with_reporter(reporter)
            .with_cancel_token(cancel);
        executor.run(&self.registry, &plan)
    }

    /// Print public recipes with their usage text
    pub fn write_list(&self, out: &mut impl Write) -> io::Result<()> {
        let entries: Vec<(String, Option<&str>)> = self
            .registry
            .iter()
            .filter(|r| !r.private)
            .map(|recipe| {
                let mut signature = recipe.name.clone();
                for param in &recipe.params {
                    signature.push(' ');
                    signature.push_str(&param.name);
                    if let Some(default) = &param.default {
                        signature.push('=');
                        signature.push_str(default);
                    }
                }
                (signature, recipe.usage.as_deref())
            })
            .collect();
        let width = entries.iter().map(|(s, _)| s.len()).max().unwrap_or(0);

        writeln!(out, "Available recipes:")?;
        for (signature, usage) in entries {
            match usage {
                Some(usage) => writeln!(out, "    {:<width$} # {}", signature, usage, width = width)?,
                None => writeln!(out, "    {}", signature)?,
            }
        }
        Ok(())
    }

    /// Print a resolved plan, one recipe per line
    pub fn write_plan(&self, plan: &Plan, out: &mut impl Write) -> io::Result<()> {
        for name in plan.recipes() {
            write!(out, "{}", name)?;
            if let Some(arguments) = plan.arguments(name) {
                for (param, value) in arguments {
                    write!(out, " {}={}", param, value)?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Build the clap command
pub fn build_cli() -> Command {
    Command::new("ordo")
        .version(crate::VERSION)
        .about("Run recipes from an ordo.yml file, prerequisites first")
        .args_conflicts_with_subcommands(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to ordo.yml config file")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print commands instead of running them")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(recipe_arg())
        .arg(recipe_args_arg())
        .subcommand(
            Command::new("run")
                .about("Run a recipe and its prerequisites (default recipe if omitted)")
                .arg(recipe_arg())
                .arg(recipe_args_arg()),
        )
        .subcommand(
            Command::new("plan")
                .about("Print the resolved plan without running anything")
                .arg(recipe_arg())
                .arg(recipe_args_arg()),
        )
        .subcommand(Command::new("list").about("List available recipes"))
        .subcommand(Command::new("check").about("Check that every recipe resolves"))
        .subcommand(
            Command::new("completions")
                .about("Generate a shell completion script")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(value_parser!(clap_complete::Shell)),
                ),
        )
}

fn recipe_arg() -> Arg {
    Arg::new("recipe")
        .value_name("RECIPE")
        .help("Recipe to run (defaults to the first declared recipe)")
}

fn recipe_args_arg() -> Arg {
    Arg::new("args")
        .value_name("ARGS")
        .help("Values for the recipe's parameters, in order")
        .num_args(1..)
        .trailing_var_arg(true)
        .allow_hyphen_values(true)
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Recipe name and positional values from `run`, `plan` or the bare form
fn recipe_request(matches: &ArgMatches) -> (Option<String>, Vec<String>) {
    let recipe = matches.get_one::<String>("recipe").cloned();
    let args = matches
        .get_many::<String>("args")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    (recipe, args)
}

/// Execute parsed arguments
pub fn dispatch(matches: &ArgMatches) -> Result<()> {
    if let Some(("completions", sub)) = matches.subcommand() {
        if let Some(shell) = sub.get_one::<clap_complete::Shell>("shell") {
            clap_complete::generate(*shell, &mut build_cli(), "ordo", &mut io::stdout());
        }
        return Ok(());
    }

    let reporter = Reporter::new(get_verbosity(matches));
    let app = App::load(matches.get_one::<PathBuf>("file").cloned())?;
    let mut stdout = io::stdout().lock();

    match matches.subcommand() {
        Some(("list", _)) => app.write_list(&mut stdout)?,
        Some(("check", _)) => {
            check(app.registry())?;
            reporter.info(&format!("{} recipe(s) resolve cleanly", app.registry().len()));
        }
        Some(("plan", sub)) => {
            let (recipe, args) = recipe_request(sub);
            let plan = app.plan(recipe.as_deref(), &args)?;
            app.write_plan(&plan, &mut stdout)?;
        }
        Some(("run", sub)) => run_recipe(&app, sub, matches, reporter)?,
        _ => run_recipe(&app, matches, matches, reporter)?,
    }

    Ok(())
}

fn run_recipe(
    app: &App,
    request: &ArgMatches,
    global: &ArgMatches,
    reporter: Reporter,
) -> Result<()> {
    let (recipe, args) = recipe_request(request);

    if global.get_flag("dry-run") {
        let runner = DryRunRunner::new(io::stdout());
        app.execute(
            runner,
            recipe.as_deref(),
            &args,
            reporter.without_command_echo(),
            CancelToken::new(),
        )?;
        return Ok(());
    }

    let cancel = CancelToken::from_signals()?;
    let runner = ShellRunner::new(cancel.clone());
    app.execute(runner, recipe.as_deref(), &args, reporter, cancel)?;
    Ok(())
}

/// Run the CLI with process arguments; returns the process exit code
pub fn main() -> i32 {
    let matches = build_cli().get_matches();
    let reporter = Reporter::new(get_verbosity(&matches));

    match dispatch(&matches) {
        Ok(()) => 0,
        Err(err) => {
            report_error(&reporter, &err);
            err.exit_code()
        }
    }
}

fn report_error(reporter: &Reporter, err: &OrdoError) {
    reporter.error(&err.to_string());
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        debug!(cause = %cause, "caused by");
        source = cause.source();
    }
}
