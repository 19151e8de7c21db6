use std::fs;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use miette::IntoDiagnostic;

use rest_conv::negotiate::Format;
use rest_conv::request::RestRequestItem;
use rest_conv::response::ResponseItem;
use rest_conv::token::SecurityToken;

#[derive(Parser, Debug)]
#[command(name = "rest-conv")]
#[command(version, about = "Render social REST API responses as JSON, XML, or Atom")]
struct Args {
    /// Input response documents (reads from stdin if not provided)
    files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long)]
    format: Option<FormatArg>,

    /// Output directory for individual rendered files (one per input file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Pretty-print single responses where the format supports it
    #[arg(short, long)]
    pretty: bool,

    /// Comma-separated fields to keep in success payloads
    #[arg(long)]
    fields: Option<String>,

    /// Viewer id recorded on batch output
    #[arg(long)]
    viewer: Option<String>,

    /// Owner id recorded on batch output
    #[arg(long)]
    owner: Option<String>,
}

#[derive(ValueEnum, Clone, Debug)]
enum FormatArg {
    Json,
    Xml,
    Atom,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Format::Json,
            FormatArg::Xml => Format::Xml,
            FormatArg::Atom => Format::Atom,
        }
    }
}

fn render_one(
    args: &Args,
    format: Format,
    input: &[u8],
    source: Option<&str>,
    writer: &mut dyn Write,
) -> miette::Result<()> {
    let document: serde_json::Value =
        serde_json::from_slice(input).map_err(|e| miette::miette!("Invalid JSON input: {e}"))?;

    let converter =
        rest_conv::formats::get_converter(format).map_err(|e| miette::miette!("{e}"))?;

    match document {
        serde_json::Value::Array(items) => {
            let responses = items
                .into_iter()
                .map(ResponseItem::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| miette::miette!("{e}"))?;
            converter
                .output_batch(&responses, &token_from(args), writer)
                .map_err(|e| miette::miette!("{e}"))?;
        }
        other => {
            let item = ResponseItem::from_json(other).map_err(|e| miette::miette!("{e}"))?;
            converter
                .output_response(&item, &request_from(args, source), writer)
                .map_err(|e| miette::miette!("{e}"))?;
        }
    }
    Ok(())
}

fn request_from(args: &Args, source: Option<&str>) -> RestRequestItem {
    let mut request = RestRequestItem::new(source.unwrap_or_default());
    if args.pretty {
        request = request.with_pretty(true);
    }
    if let Some(fields) = &args.fields {
        let fields: Vec<String> = fields
            .split(',')
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        request = request.with_fields(fields);
    }
    request
}

fn token_from(args: &Args) -> SecurityToken {
    let mut token = SecurityToken::anonymous();
    if let Some(viewer) = &args.viewer {
        token.viewer_id = viewer.clone();
    }
    if let Some(owner) = &args.owner {
        token.owner_id = owner.clone();
    }
    token
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    let format = args
        .format
        .clone()
        .map(Format::from)
        .unwrap_or(Format::Json);

    if args.files.is_empty() {
        // stdin mode
        if io::stdin().is_terminal() {
            return Err(miette::miette!(
                "No input file specified and stdin is a terminal.\nUsage: rest-conv <FILE>... or pipe a response document to stdin"
            ));
        }
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).into_diagnostic()?;

        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        render_one(&args, format, &buf, None, &mut writer)?;
        writeln!(writer).into_diagnostic()?;
        writer.flush().into_diagnostic()?;
    } else if let Some(ref output_dir) = args.output_dir {
        // One rendered document per input file
        fs::create_dir_all(output_dir).into_diagnostic()?;

        for path in &args.files {
            let input = fs::read(path).into_diagnostic()?;
            let source = path.to_string_lossy().into_owned();

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "output".to_string());
            let out_path = output_dir.join(format!("{stem}.{}", format.extension()));

            let file = fs::File::create(&out_path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            render_one(&args, format, &input, Some(&source), &mut writer)?;
            writer.flush().into_diagnostic()?;
        }
    } else {
        // All documents to stdout, newline-terminated
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());

        for path in &args.files {
            let input = fs::read(path).into_diagnostic()?;
            let source = path.to_string_lossy().into_owned();
            render_one(&args, format, &input, Some(&source), &mut writer)?;
            writeln!(writer).into_diagnostic()?;
        }
        writer.flush().into_diagnostic()?;
    }

    Ok(())
}
