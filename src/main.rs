use dialoguer::{Confirm, Input, Select};
use pdfa3_convert::{Converter, TOOL_NAME};
use std::env;
use std::error::Error;
use std::process;

#[derive(Debug, Default)]
struct Options {
    input: String,
    output: String,
    producer: Option<String>,
    creator: Option<String>,
    zugferd: bool,
    zugferd_level: Option<String>,
    level: Option<char>,
    ignore_a1_errors: bool,
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <input.pdf> <output.pdf> [--producer P] [--creator C] \
         [--zugferd] [--zugferd-level L] [--level A|B|U] [--ignore-a1-errors]",
        program
    );
    eprintln!("Example: {} invoice-a1.pdf invoice-a3.pdf --zugferd", program);
    process::exit(1);
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut positional = Vec::new();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--producer" => options.producer = Some(value("--producer")?),
            "--creator" => options.creator = Some(value("--creator")?),
            "--zugferd" => options.zugferd = true,
            "--zugferd-level" => options.zugferd_level = Some(value("--zugferd-level")?),
            "--level" => {
                let level = value("--level")?;
                let mut chars = level.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => options.level = Some(c),
                    _ => return Err(format!("--level expects a single letter, got {:?}", level)),
                }
            }
            "--ignore-a1-errors" => options.ignore_a1_errors = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option {}", flag)),
            _ => positional.push(arg.clone()),
        }
    }

    match <[String; 2]>::try_from(positional) {
        Ok([input, output]) => {
            options.input = input;
            options.output = output;
            Ok(options)
        }
        Err(_) => Err("Expected an input and an output path".to_string()),
    }
}

/// Fills in whatever the command line left open, asking when a terminal is
/// attached.
fn complete_interactively(options: &mut Options) -> Result<(), Box<dyn Error>> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(());
    }

    if options.producer.is_none() {
        let producer = Input::<String>::new()
            .with_prompt("Producer")
            .default(TOOL_NAME.to_string())
            .interact_text()?;
        options.producer = Some(producer);
    }

    if options.creator.is_none() {
        let creator = Input::<String>::new()
            .with_prompt("Creator")
            .allow_empty(true)
            .interact_text()?;
        options.creator = Some(creator);
    }

    if options.level.is_none() {
        let levels = ["U - visual and unicode", "B - visual only", "A - full (tagged PDF)"];
        let selection = Select::new()
            .with_prompt("PDF/A-3 conformance level")
            .items(&levels)
            .default(0)
            .interact()?;
        options.level = Some(['U', 'B', 'A'][selection]);
    }

    if !options.zugferd {
        options.zugferd = Confirm::new()
            .with_prompt("Add ZUGFeRD invoice metadata?")
            .default(false)
            .interact()?;
    }

    Ok(())
}

fn run(mut options: Options) -> Result<(), Box<dyn Error>> {
    complete_interactively(&mut options)?;

    let producer = options.producer.unwrap_or_else(|| TOOL_NAME.to_string());
    let creator = options.creator.unwrap_or_default();

    let converter = Converter::new()
        .ignore_gate_failures(options.ignore_a1_errors)
        .conformance_level(options.level.unwrap_or('U'))
        .invoice_conformance_level(options.zugferd_level.as_deref());

    let mut converted =
        converter.convert_file(&options.input, &producer, &creator, options.zugferd)?;
    for warning in converted.warnings() {
        eprintln!("Warning: {}", warning);
    }
    converted.save(&options.output)?;

    println!("Written: {}", options.output);
    for (key, value) in converted.document_info()? {
        println!("  {:<10}: {}", key, value);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            usage(&args[0]);
        }
    };

    if !std::path::Path::new(&options.input).exists() {
        eprintln!("Error: file not found: {}", options.input);
        process::exit(1);
    }

    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_with_flags() {
        let options = parse_args(&args(&[
            "pdfa3_convert",
            "in.pdf",
            "--zugferd",
            "--level",
            "B",
            "out.pdf",
            "--producer",
            "Acme",
        ]))
        .unwrap();
        assert_eq!(options.input, "in.pdf");
        assert_eq!(options.output, "out.pdf");
        assert_eq!(options.level, Some('B'));
        assert_eq!(options.producer.as_deref(), Some("Acme"));
        assert!(options.zugferd);
        assert!(!options.ignore_a1_errors);
    }

    #[test]
    fn test_parse_args_rejects_missing_output() {
        assert!(parse_args(&args(&["pdfa3_convert", "in.pdf"])).is_err());
    }

    #[test]
    fn test_parse_args_rejects_missing_value() {
        assert!(parse_args(&args(&["pdfa3_convert", "a.pdf", "b.pdf", "--creator"])).is_err());
    }
}
