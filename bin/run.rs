use hackvm::{
    hack,
    translator::Translator,
    vm::Parser,
    emulator::{Emulator, EmulatorError, SP, STACK_BASE},
};

use std::fmt;
use std::fs::File;
use std::path::Path;

use clap::{App, Arg, ArgMatches};
use slog::{o, Discard, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

const DEFAULT_CYCLES: &str = "1000000";

enum Error {
    Translation(hackvm::Error),
    Assembly(hack::Error),
    Execution(EmulatorError),
    Argument(String),
    IO(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IO(e)
    }
}

impl From<hackvm::Error> for Error {
    fn from(e: hackvm::Error) -> Error {
        Error::Translation(e)
    }
}

impl From<hack::Error> for Error {
    fn from(e: hack::Error) -> Error {
        Error::Assembly(e)
    }
}

impl From<EmulatorError> for Error {
    fn from(e: EmulatorError) -> Error {
        Error::Execution(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Translation(e) => write!(f, "translation error: {}", e),
            Error::Assembly(e) => write!(f, "assembly error: {}", e),
            Error::Execution(e) => write!(f, "execution error: {}", e),
            Error::Argument(e) => write!(f, "invalid argument: {}", e),
            Error::IO(e) => write!(f, "IO error: {}", e),
        }
    }
}

fn parse_arguments() -> ArgMatches<'static> {
    App::new("hackvm-run")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Mitja Karhusaari <mitja@karhusaari.me>")
        .about("Translates, assembles and executes VM programs on an emulated Hack computer")
        .arg(Arg::with_name("source")
             .help("File containing VM commands (.vm) or Hack assembly (.asm)")
             .value_name("SOURCE")
             .required(true)
             .index(1))
        .arg(Arg::with_name("cycles")
             .help("Maximum number of instructions to execute")
             .value_name("N")
             .long("cycles")
             .takes_value(true)
             .default_value(DEFAULT_CYCLES))
        .arg(Arg::with_name("set")
             .help("Sets RAM[ADDR] to VALUE before execution, SP defaults to 256")
             .value_name("ADDR=VALUE")
             .long("set")
             .takes_value(true)
             .multiple(true)
             .number_of_values(1))
        .arg(Arg::with_name("verbose")
             .help("Enables verbose logging")
             .long("verbose")
             .short("v"))
        .get_matches()
}

fn build_logger(verbose: bool) -> Logger {
    if !verbose {
        return Logger::root(Discard, o!());
    }

    let decorator = TermDecorator::new().build();
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}

fn parse_assignment(input: &str) -> Result<(u16, i16), Error> {
    let invalid = || Error::Argument(format!("'{}' is not of the form ADDR=VALUE", input));

    let mut parts = input.splitn(2, '=');
    let address = parts.next().ok_or_else(invalid)?;
    let value = parts.next().ok_or_else(invalid)?;

    let address = address.trim().parse().map_err(|_| invalid())?;
    let value = value.trim().parse().map_err(|_| invalid())?;

    Ok((address, value))
}

fn load_assembly(file_path: &Path, logger: &Logger) -> Result<String, Error> {
    let is_vm = file_path.extension().map(|ext| ext == "vm").unwrap_or(false);

    if !is_vm {
        return Ok(std::fs::read_to_string(file_path)?);
    }

    let mut parser = Parser::load(File::open(file_path)?, logger.clone())?;
    let mut translator = Translator::new().logger(logger.clone());

    if let Some(stem) = file_path.file_stem().and_then(|stem| stem.to_str()) {
        translator = translator.file_name(stem);
    }

    let output = translator.translate(&mut parser, Vec::new())?;

    Ok(String::from_utf8_lossy(&output).into_owned())
}

fn run(args: &ArgMatches, logger: Logger) -> Result<(), Error> {
    let file_path = Path::new(args.value_of("source").unwrap_or_default());

    let max_cycles = args
        .value_of("cycles")
        .unwrap_or(DEFAULT_CYCLES)
        .parse::<usize>()
        .map_err(|e| Error::Argument(format!("--cycles: {}", e)))?;

    let assignments = args
        .values_of("set")
        .map(|values| values.map(parse_assignment).collect::<Result<Vec<_>, _>>())
        .unwrap_or_else(|| Ok(Vec::new()))?;

    let assembly = load_assembly(file_path, &logger)?;
    let program = hack::assemble(&assembly, logger.clone())?;

    let mut emulator = Emulator::with_logger(&program, logger);
    emulator.set_data(SP, STACK_BASE as i16)?;

    for (address, value) in assignments {
        emulator.set_data(address, value)?;
    }

    let cycles = emulator.run(max_cycles)?;

    println!("finished after {} cycles", cycles);
    println!("SP = {}", emulator.get_data(SP)?);
    println!("stack: {:?}", emulator.stack());

    Ok(())
}

fn main() {
    let args = parse_arguments();
    let logger = build_logger(args.is_present("verbose"));

    if let Err(err) = run(&args, logger) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
