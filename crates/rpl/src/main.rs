use rpl::{parse_file, print_program, render_diagnostic, RplError};
use std::env;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(RplError::Diagnostics) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), RplError> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_help();
        return Ok(());
    };
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "-h" | "--help" => {
            print_help();
            Ok(())
        }
        "parse" => {
            let Some(path) = rest.first() else {
                print_help();
                return Ok(());
            };
            let program = match parse_file(Path::new(path)) {
                Ok(program) => program,
                Err(RplError::Parse { path, diagnostic }) => {
                    eprintln!("{}", render_diagnostic(&path, &diagnostic));
                    return Err(RplError::Diagnostics);
                }
                Err(err) => return Err(err),
            };
            let output = serde_json::to_string_pretty(&program)
                .map_err(|err| RplError::Io(std::io::Error::other(err)))?;
            println!("{output}");
            Ok(())
        }
        "check" => {
            if rest.is_empty() {
                print_help();
                return Ok(());
            }
            let mut had_errors = false;
            for path in &rest {
                match parse_file(Path::new(path)) {
                    Ok(_) => {}
                    Err(RplError::Parse { path, diagnostic }) => {
                        eprintln!("{}", render_diagnostic(&path, &diagnostic));
                        had_errors = true;
                    }
                    Err(err) => return Err(err),
                }
            }
            if had_errors {
                return Err(RplError::Diagnostics);
            }
            Ok(())
        }
        "fmt" => {
            let Some(path) = rest.first() else {
                print_help();
                return Ok(());
            };
            let program = match parse_file(Path::new(path)) {
                Ok(program) => program,
                Err(RplError::Parse { path, diagnostic }) => {
                    eprintln!("{}", render_diagnostic(&path, &diagnostic));
                    return Err(RplError::Diagnostics);
                }
                Err(err) => return Err(err),
            };
            print!("{}", print_program(&program));
            Ok(())
        }
        _ => {
            print_help();
            Err(RplError::Io(std::io::Error::other(format!(
                "unknown command {command}"
            ))))
        }
    }
}

fn print_help() {
    println!(
        "rpl\n\nUSAGE:\n  rpl <COMMAND>\n\nCOMMANDS:\n  parse <path>          parse one policy file and print its AST as JSON\n  check <path>...       parse files, reporting the first error in each\n  fmt <path>            parse and reprint one policy file canonically\n\n  -h, --help"
    );
}
