use minforth::{
    lang::{BOOTSTRAP_SOURCE, code::pretty_print_code},
    runtime::{
        error::{self, ScriptError},
        interpreter::{CodeManagement, virtual_machine::VirtualMachine},
    },
};
use log::info;
use std::{
    env::{args, var},
    fs::read_to_string,
    io::{Read, Write, stdin, stdout},
};

/// How this run was asked to behave, gathered from the command line.
struct Settings {
    /// Print the disassembly of the linked program before running it.
    dump: bool,

    /// The script to run.  Standard input is read when not given.
    script: Option<String>,
}

impl Settings {
    /// Usage: `minforth [--dump] [script]`
    fn from_args(arguments: Vec<String>) -> error::Result<Settings> {
        let mut settings = Settings {
            dump: false,
            script: None,
        };

        for argument in arguments.into_iter().skip(1) {
            match argument.as_str() {
                "--dump" => settings.dump = true,

                _ if argument.starts_with("--") => {
                    return ScriptError::new_as_result(
                        None,
                        format!("Unknown option {}.  Usage: minforth [--dump] [script]", argument),
                        None,
                    );
                }

                _ if settings.script.is_none() => settings.script = Some(argument),

                _ => {
                    return ScriptError::new_as_result(
                        None,
                        "Only one script can be given.  Usage: minforth [--dump] [script]"
                            .to_string(),
                        None,
                    );
                }
            }
        }

        Ok(settings)
    }
}

/// Read a source file, reporting which file could not be read.
fn read_source(path: &str) -> error::Result<String> {
    match read_to_string(path) {
        Ok(source) => Ok(source),
        Err(err) => {
            ScriptError::new_as_result(None, format!("Could not read file {}: {}", path, err), None)
        }
    }
}

/// The bootstrap library is either the built-in one or the file named by the environment variable
/// MINFORTH_BOOTSTRAP.
fn bootstrap_source() -> error::Result<(String, String)> {
    if let Ok(path) = var("MINFORTH_BOOTSTRAP") {
        let source = read_source(&path)?;
        Ok((path, source))
    } else {
        Ok(("<bootstrap>".to_string(), BOOTSTRAP_SOURCE.to_string()))
    }
}

/// Log to stderr, filtered by the MINFORTH_LOG environment variable.
fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::new().filter_or("MINFORTH_LOG", "warn"))
        .format_timestamp_secs()
        .try_init();
}

fn main() -> error::Result<()> {
    init_logging();

    let settings = Settings::from_args(args().collect())?;
    let mut vm = VirtualMachine::new();

    // The bootstrap words are ordinary source, compiled ahead of the user's program so that the
    // program can call them.
    let (bootstrap_path, bootstrap) = bootstrap_source()?;
    vm.process_source(&bootstrap_path, &bootstrap)?;
    info!("Loaded bootstrap library from {}.", bootstrap_path);

    let (path, source) = match &settings.script {
        Some(path) => (path.clone(), read_source(path)?),
        None => {
            let mut source = String::new();
            stdin().read_to_string(&mut source)?;
            ("<stdin>".to_string(), source)
        }
    };

    vm.process_source(&path, &source)?;
    info!("Loaded program from {}.", path);

    let stdout = stdout();
    let mut output = stdout.lock();

    if settings.dump {
        write!(output, "{}", pretty_print_code(vm.image()))?;
    }

    vm.run(&mut output)?;
    output.flush()?;

    info!("Program finished.");
    Ok(())
}
