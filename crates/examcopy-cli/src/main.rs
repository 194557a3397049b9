use anyhow::{Context, Result};
use examcopy_engine::{ContentBlock, ExamDocument, MediaKind, MediaRegistry};
use examcopy_render::{RawMath, render_preview};
use std::{env, path::PathBuf, process};

enum Output {
    Text,
    Json,
    Html,
}

struct Args {
    input: PathBuf,
    solution: Option<PathBuf>,
    output: Output,
}

fn parse_args() -> Option<Args> {
    let mut input = None;
    let mut solution = None;
    let mut output = Output::Text;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => output = Output::Json,
            "--html" => output = Output::Html,
            "--solution" => solution = Some(PathBuf::from(args.next()?)),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => return None,
        }
    }

    Some(Args {
        input: input?,
        solution,
        output,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args() else {
        eprintln!("Usage: examcopy-cli <exam-file> [--solution <file>] [--json | --html]");
        process::exit(1);
    };

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let solution_content = match &args.solution {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };

    let source_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "exam".to_string());
    let doc = ExamDocument::parse(&content, solution_content.as_deref(), source_name);

    match args.output {
        Output::Text => {
            print_blocks(&doc.body);
            if let Some(solution) = &doc.solution {
                println!("\n========== LỜI GIẢI ==========\n");
                print_blocks(solution);
            }
        }
        Output::Json => println!("{}", serde_json::to_string_pretty(&doc)?),
        Output::Html => {
            let registry = MediaRegistry::new();
            print!("{}", render_preview(&doc.body, &registry, &RawMath));
            if let Some(solution) = &doc.solution {
                print!("{}", render_preview(solution, &registry, &RawMath));
            }
        }
    }

    Ok(())
}

fn print_blocks(blocks: &[ContentBlock]) {
    for block in blocks {
        match block {
            ContentBlock::Header { text, .. } => println!("== {text} =="),
            ContentBlock::Paragraph { text, .. } => println!("{text}"),
            ContentBlock::Spacer => println!(),
            ContentBlock::Table { rows } => {
                for row in rows {
                    println!("| {} |", row.join(" | "));
                }
            }
            ContentBlock::Code { text, lang } => {
                println!("```{}", lang.as_deref().unwrap_or(""));
                println!("{text}");
                println!("```");
            }
            ContentBlock::Media { key, kind, .. } => {
                let label = match kind {
                    MediaKind::Geometry => "geometry figure",
                    MediaKind::AiImage => "AI illustration",
                };
                println!("[{label}, slot {}]", key.index);
            }
        }
    }
}
