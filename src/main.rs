#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # structgrade
//!
//! Command line front end: grades a Java file against the structure rubric
//! and reports the verdict through the exit code (0 pass, 1 fail, 2 error).

use std::process::ExitCode;

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use structgrade::{
    StructureGrader, config,
    grade::{MethodCoverage, verdict_line, verdict_table},
    java::{JavaSourceParser, SourceParser},
};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade a file
    Check {
        /// path to the java file
        file:   String,
        /// require every rubric method in every class
        strict: bool,
        /// print the verdict as JSON
        json:   bool,
    },
    /// Print the parsed source unit of a file
    Info(String),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parsers file name
    fn f() -> impl Parser<String> {
        positional("FILENAME").help("Path to the java file")
    }

    let strict = long("strict")
        .help("Require every rubric method in every class, not just one")
        .switch();
    let json = long("json")
        .help("Print the verdict as JSON instead of a table")
        .switch();
    let file = f();

    let check = construct!(Cmd::Check { strict, json, file })
        .to_options()
        .command("check")
        .help("Check a file for the required interface structure");

    let info = construct!(Cmd::Info(f()))
        .to_options()
        .command("info")
        .help("Prints a JSON description of the file as parsed");

    let cmd = construct!([check, info]);

    cmd.to_options()
        .descr("Structural grader for Java sources")
        .run()
}

/// Installs the fmt subscriber at the given level.
fn init_tracing(filter: LevelFilter) {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter)
        .init();
}

/// Runs a command, returning whether it succeeded.
fn run(cmd: Cmd) -> Result<bool> {
    match cmd {
        Cmd::Check { file, strict, json } => {
            let mut rubric = config::rubric()?;
            if strict {
                rubric = rubric.with_coverage(MethodCoverage::All);
            }

            let verdict = StructureGrader::new(rubric).grade(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                println!("{}", verdict_table(&verdict));
                println!("{}", verdict_line(&verdict));
            }
            Ok(verdict.is_pass())
        }
        Cmd::Info(file) => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("Could not read file: {file}"))?;
            let unit = JavaSourceParser
                .parse(&source)
                .with_context(|| format!("Could not parse {file}"))?;
            println!("{}", serde_json::to_string_pretty(&unit)?);
            Ok(true)
        }
    }
}

/// Maps the outcome of `run` to the process exit status: 0 pass, 1 fail,
/// 2 error.
fn exit_status(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    dotenv().ok();

    let cmd = options();
    let quiet = matches!(cmd, Cmd::Check { json: true, .. } | Cmd::Info(_));
    init_tracing(if quiet {
        LevelFilter::OFF
    } else {
        LevelFilter::INFO
    });

    let outcome = run(cmd);
    if let Err(e) = &outcome {
        eprintln!("{e:?}");
    }
    ExitCode::from(exit_status(&outcome))
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use uuid::Uuid;

    use super::*;

    fn reference() -> String {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures/java/animals/AccessingInterfaceMethodsAssignment.java")
            .display()
            .to_string()
    }

    fn check(file: String, strict: bool, json: bool) -> u8 {
        exit_status(&run(Cmd::Check { file, strict, json }))
    }

    fn write_temp(contents: &str) -> (PathBuf, String) {
        let dir = std::env::temp_dir().join(format!("structgrade-cli-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("Assignment.java");
        fs::write(&path, contents).expect("write source");
        (dir, path.display().to_string())
    }

    #[test]
    fn passing_file_exits_zero_in_every_mode() {
        assert_eq!(check(reference(), false, false), 0);
        assert_eq!(check(reference(), true, false), 0);
        assert_eq!(check(reference(), false, true), 0);
    }

    #[test]
    fn missing_file_exits_one() {
        let missing = std::env::temp_dir()
            .join(format!("structgrade-cli-{}", Uuid::new_v4()))
            .join("Missing.java");
        assert_eq!(check(missing.display().to_string(), false, true), 1);
    }

    #[test]
    fn strict_flag_turns_partial_coverage_into_a_failure() {
        let cat_sound = "public void sound() {\n\t\tSystem.out.println(\"The cat";
        let original = fs::read_to_string(reference()).expect("read reference");
        assert!(original.contains(cat_sound));
        let source = original.replace(cat_sound, &cat_sound["public ".len()..]);
        let (dir, file) = write_temp(&source);

        let loose = check(file.clone(), false, true);
        let strict = check(file, true, true);
        let _ = fs::remove_dir_all(dir);

        assert_eq!(loose, 0);
        assert_eq!(strict, 1);
    }

    #[test]
    fn unparseable_file_exits_two() {
        let (dir, file) = write_temp("class Dog implements AnimalInterface {\n  void sound( {\n");
        let status = check(file.clone(), false, false);
        let info = exit_status(&run(Cmd::Info(file)));
        let _ = fs::remove_dir_all(dir);

        assert_eq!(status, 2);
        assert_eq!(info, 2);
    }
}
