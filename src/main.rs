#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
extern crate loggerv;

use portcat::show::{self, OutputFormat};
use portcat::structs::PublishMode;
use portcat::{AppInstance, Result};

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::path::Path;
use std::process;

fn print_error_debug(e: &portcat::Error) {
    // unwind the error chain
    for e in e.iter().skip(1) {
        warn!("caused by: {}", e);
    }
}

fn file_args<'a, 'b>(sc: App<'a, 'b>) -> App<'a, 'b> {
    sc.arg(Arg::with_name("file")
            .required(true)
            .help("App definition yaml"))
        .arg(Arg::with_name("json")
            .long("json")
            .help("Print json rather than yaml"))
}

fn app_args<'a, 'b>(sc: App<'a, 'b>) -> App<'a, 'b> {
    file_args(sc)
        .arg(Arg::with_name("dev")
            .long("dev")
            .help("Run in development mode (open dev ports)"))
        .arg(Arg::with_name("mode")
            .short("m")
            .long("mode")
            .takes_value(true)
            .possible_values(&["none", "defaults", "all"])
            .help("Override the publish mode of the app"))
}

fn main() {
    let app = App::new("portcat")
        .version(crate_version!())
        .setting(AppSettings::VersionlessSubcommands)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::ColoredHelp)
        .setting(AppSettings::DeriveDisplayOrder)
        .global_settings(&[AppSettings::ColoredHelp])
        .about("Publish ports right meow")
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .global(true)
            .help("Increase verbosity"))
        .arg(Arg::with_name("debug")
            .short("d")
            .long("debug")
            .global(true)
            .help("Adds line numbers to log statements"))
        .subcommand(app_args(SubCommand::with_name("ports")
            .about("Show the service ports published for an app")
            .arg(Arg::with_name("container")
                .short("c")
                .long("container")
                .takes_value(true)
                .help("Only show this container"))))
        .subcommand(app_args(SubCommand::with_name("routes")
            .about("Show the http ports routed per hostname")
            .arg(Arg::with_name("container")
                .short("c")
                .long("container")
                .takes_value(true)
                .help("Only show this container"))))
        .subcommand(file_args(SubCommand::with_name("links")
            .about("Show which routers are linked to other services")));

    let args = app.get_matches();
    let name = args.subcommand_name().unwrap_or("portcat").to_string();
    let _ = run(&args).map_err(|e| {
        error!("{} error: {}", name, e);
        print_error_debug(&e);
        process::exit(1);
    });
    process::exit(0);
}

fn run(args: &ArgMatches) -> Result<()> {
    // always show INFO messages (+1)
    loggerv::Logger::new()
        .verbosity(args.occurrences_of("verbose") + 1)
        .module_path(true)
        .line_numbers(args.is_present("debug"))
        .init()
        .map_err(|e| format!("failed to initialise logger: {}", e))?;

    // Ignore SIGPIPE errors to avoid having to use let _ = write! everywhere
    // See https://github.com/rust-lang/rust/issues/46016
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    dispatch_commands(args)
}

/// Load the app and apply cli overrides
fn load_app(args: &ArgMatches) -> Result<AppInstance> {
    // file is a required arg
    let pth = args.value_of("file").unwrap_or_default();
    let mut app = AppInstance::read(Path::new(pth))?;
    if args.is_present("dev") {
        app.spec.dev_mode = true;
    }
    if let Some(m) = args.value_of("mode") {
        app.spec.publish_mode = match m {
            "none" => PublishMode::None,
            "all" => PublishMode::All,
            _ => PublishMode::Defaults,
        };
    }
    debug!("Loaded app {} with publish mode {:?}", app.name, app.spec.publish_mode);
    Ok(app)
}

fn output_format(args: &ArgMatches) -> OutputFormat {
    if args.is_present("json") { OutputFormat::Json } else { OutputFormat::Yaml }
}

/// Dispatch clap arguments to portcat handlers
fn dispatch_commands(args: &ArgMatches) -> Result<()> {
    if let Some(a) = args.subcommand_matches("ports") {
        let app = load_app(a)?;
        return show::print_ports(&app, a.value_of("container"), output_format(a));
    }
    else if let Some(a) = args.subcommand_matches("routes") {
        let app = load_app(a)?;
        return show::print_routes(&app, a.value_of("container"), output_format(a));
    }
    else if let Some(a) = args.subcommand_matches("links") {
        let app = load_app(a)?;
        return show::print_links(&app, output_format(a));
    }

    unreachable!("Subcommand valid, but not implemented");
}
