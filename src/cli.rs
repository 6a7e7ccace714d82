//! CLI: validate JSON/NDJSON documents against a claim.
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;

use claim_check::{path_de, validate, Claim, Lookup, Report, Validation, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// check JSON documents against a declarative claim and report every failure with its location
#[derive(Parser, Debug)]
#[command(name = "claim-check", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate documents and print a located failure report
    Validate(ValidateOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Parser, Debug)]
struct ValidateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// claim file (JSON)
    #[arg(long)]
    claim: PathBuf,

    /// lookup table file (JSON object of reference name → claim)
    #[arg(long)]
    lookup: Option<PathBuf>,

    /// report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// disable ANSI colors in the text report
    #[arg(long)]
    no_color: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// One unit of input, named after where it came from.
#[derive(Debug)]
struct Document {
    source: String,
    value: Value,
}

#[derive(Serialize)]
struct Outcome<'a> {
    source: &'a str,
    valid: bool,
    validation: &'a Validation,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {source_path_str}"))?;
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let name = format!("{source_path_str}:{}", line_no + 1);
                    let json_value = serde_json::from_str::<serde_json::Value>(line)
                        .with_context(|| format!("failed to parse JSON line ({name})"))?;
                    self.select(name, json_value, &mut documents)?;
                }
            } else {
                let json_value = serde_json::from_str::<serde_json::Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                self.select(source_path_str, json_value, &mut documents)?;
            }
        }
        tracing::debug!(count = documents.len(), "loaded documents");
        Ok(documents)
    }

    /// Applies `--json-pointer` then `--jq-expr`.
    fn select(&self, name: String, json_value: serde_json::Value, out: &mut Vec<Document>) -> Result<()> {
        let json_value = match self.json_pointer.as_deref() {
            None => json_value,
            Some(pointer) => match json_value.pointer(pointer) {
                Some(node) => node.clone(),
                None => bail!("JSON pointer {pointer} selects nothing in {name}"),
            },
        };
        let Some(jq_expr) = self.jq_expr.as_deref() else {
            out.push(Document { source: name, value: Value::from(json_value) });
            return Ok(());
        };
        let results = crate::jq_exec::run_jaq(jq_expr, &json_value)
            .with_context(|| format!("failed to apply jq expression to {name}"))?;
        for (i, result) in results.into_iter().enumerate() {
            out.push(Document { source: format!("{name}#{i}"), value: Value::from(result) });
        }
        Ok(())
    }
}

impl ValidateOut {
    fn load_claim(&self) -> Result<Claim> {
        read_json(&self.claim)
    }

    fn load_lookup(&self) -> Result<Lookup> {
        match self.lookup.as_ref() {
            Some(path) => read_json(path),
            None => Ok(Lookup::new()),
        }
    }

    fn render(&self, documents: &[Document], validations: &[Validation]) -> Result<String> {
        let pairs = documents.iter().zip(validations);
        match self.format {
            OutputFormat::Json => {
                let outcomes: Vec<Outcome<'_>> = pairs
                    .map(|(doc, validation)| Outcome {
                        source: &doc.source,
                        valid: validation.is_valid(),
                        validation,
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&outcomes)?)
            }
            OutputFormat::Text => {
                let colored = !self.no_color && self.out.is_none();
                let mut text = String::new();
                for (doc, validation) in pairs {
                    if validation.is_valid() {
                        let mark = if colored { "✓".green().to_string() } else { "✓".to_string() };
                        text.push_str(&format!("{mark} {}\n", doc.source));
                        continue;
                    }
                    let mark = if colored { "✗".red().to_string() } else { "✗".to_string() };
                    text.push_str(&format!("{mark} {}\n", doc.source));
                    let report = Report::new(validation).colored(colored).to_string();
                    for line in report.lines() {
                        text.push_str(&format!("    {line}\n"));
                    }
                }
                Ok(text)
            }
        }
    }

    /// Returns whether every document was valid.
    fn run(&self) -> Result<bool> {
        let claim = self.load_claim()?;
        let lookup = self.load_lookup()?;
        let documents = self.input_settings.load_documents()?;

        // claim and lookup are read-only; documents are independent
        let validations = documents
            .par_iter()
            .map(|doc| {
                validate(&claim, &doc.value, &lookup)
                    .with_context(|| format!("cannot validate {}", doc.source))
            })
            .collect::<Result<Vec<_>>>()?;

        let failed = validations.iter().filter(|v| v.is_failure()).count();
        tracing::info!(documents = documents.len(), failed, "validation finished");

        let rendered = self.render(&documents, &validations)?;
        match self.out.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(out, &rendered).with_context(|| format!("failed to write {}", out.display()))?;
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                if !rendered.ends_with('\n') {
                    writeln!(stdout)?;
                }
            }
        }
        Ok(failed == 0)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// `Ok(false)` when some document failed validation.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Validate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(true);
                }
                target.run()
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let value = path_de::from_slice_with_path(&bytes).with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(value)
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
