use hackvm::{
    error::{Error, ErrorExt},
    translator::Translator,
    vm::Parser,
};

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{App, Arg, ArgMatches};
use slog::{o, warn, Discard, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

fn parse_arguments() -> ArgMatches<'static> {
    App::new("hackvm-translate")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Mitja Karhusaari <mitja@karhusaari.me>")
        .about("Translates VM stack machine code into Hack assembly")
        .arg(Arg::with_name("source")
             .help("File containing VM commands")
             .value_name("SOURCE")
             .required(true)
             .index(1))
        .arg(Arg::with_name("output")
             .help("Path of the produced assembly, defaults to SOURCE with the extension .asm")
             .value_name("OUTPUT")
             .long("output")
             .short("o")
             .takes_value(true))
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

fn translate(source: &Path, output: &Path, logger: Logger) -> Result<(), Error> {
    let file = File::open(source)
        .map_err(Error::from)
        .context("could not open the source file")?;

    let mut parser = Parser::load(file, logger.clone())?;

    let sink = File::create(output)
        .map(BufWriter::new)
        .map_err(Error::from)
        .context("could not create the output file")?;

    let mut translator = Translator::new().logger(logger.clone());

    if let Some(stem) = source.file_stem().and_then(|stem| stem.to_str()) {
        translator = translator.file_name(stem);
    }

    if let Err(err) = translator.translate(&mut parser, sink) {
        // Partial output is not valid assembly.
        discard_output(output, &logger);
        return Err(err);
    }

    Ok(())
}

/// Removes `output`, logging a warning if that fails. Returns true if the file is gone.
fn discard_output(output: &Path, logger: &Logger) -> bool {
    match std::fs::remove_file(output) {
        Ok(()) => true,
        Err(err) => {
            warn!(logger, "could not remove the partial output";
                "path" => %output.display(),
                "error" => %err);
            false
        },
    }
}

fn main() {
    let args = parse_arguments();

    let source = PathBuf::from(args.value_of("source").unwrap_or_default());

    let output = match args.value_of("output") {
        Some(path) => PathBuf::from(path),
        None => source.with_extension("asm"),
    };

    let logger = build_logger(args.is_present("verbose"));

    if let Err(err) = translate(&source, &output, logger) {
        eprintln!("{}: {}", source.display(), err);
        std::process::exit(1);
    }
}
