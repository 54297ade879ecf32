//! qrforge interactive CLI entrypoint

use clap::Parser;
use qrforge::{
    BoxScale, Color, Error, QrSession, QrforgeConfig, RenderParameters, Result, logging,
};
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "qrforge",
    version,
    about = "Customizable QR code generator with session history"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrforge.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Generate a QR code for this text immediately on launch
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,

    /// Output results as JSON lines instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Override the directory downloads are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Override the CSV export path
    #[arg(long, value_name = "PATH")]
    export_file: Option<PathBuf>,

    /// Override the QR module scale (small/medium/large)
    #[arg(long, value_name = "SIZE")]
    size: Option<String>,

    /// Override the fill color (hex or named)
    #[arg(long, value_name = "COLOR")]
    fill: Option<String>,

    /// Override the background color (hex or named)
    #[arg(long, value_name = "COLOR")]
    back: Option<String>,

    /// Override the border thickness in modules (1-10)
    #[arg(long, value_name = "N")]
    border: Option<u32>,

    /// Suppress the terminal preview after each generation
    #[arg(long)]
    no_preview: bool,
}

/// Output routing for command results, mirroring the `--json` flag
struct Output {
    json: bool,
}

impl Output {
    fn ok(&self, action: &str, message: String) {
        if self.json {
            let payload = json!({ "ok": true, "action": action, "message": message });
            println!("{payload}");
        } else {
            println!("{message}");
        }
    }

    fn err(&self, action: &str, error: &Error) {
        if self.json {
            let payload = json!({ "ok": false, "action": action, "error": error.to_string() });
            println!("{payload}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = QrforgeConfig::load(cli.config.as_deref())?;

    if let Some(ref dir) = cli.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(ref file) = cli.export_file {
        config.output.export_file = file.clone();
    }
    if let Some(ref size) = cli.size {
        config.render.size = size.clone();
    }
    if let Some(ref fill) = cli.fill {
        config.render.fill_color = fill.clone();
    }
    if let Some(ref back) = cli.back {
        config.render.back_color = back.clone();
    }
    if let Some(border) = cli.border {
        config.render.border = border;
    }

    logging::init(&config.logging)?;

    let mut params = config.render_parameters()?;
    let mut session = QrSession::from_config(&config.output);
    let output = Output { json: cli.json };
    let preview = !cli.no_preview;

    if let Some(ref text) = cli.text {
        run_generate(&mut session, &params, text, &output, preview);
    }

    if !cli.json {
        println!("qrforge interactive session. Type 'help' for commands.");
    }

    let stdin = io::stdin();
    loop {
        if !cli.json {
            print!("> ");
            io::stdout().flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "generate" | "gen" => run_generate(&mut session, &params, rest, &output, preview),
            "download" | "dl" => run_download(&mut session, &params, &output),
            "export" => run_export(&session, &output),
            "history" => show_history(&session, &output),
            "set" => apply_set(&mut params, rest, &output),
            "params" => show_params(&params, &output),
            "help" => print_help(),
            "quit" | "exit" => break,
            other => output.err(
                "command",
                &Error::Validation(format!("Unknown command '{other}'. Type 'help'")),
            ),
        }
    }

    Ok(())
}

fn run_generate(
    session: &mut QrSession,
    params: &RenderParameters,
    text: &str,
    output: &Output,
    preview: bool,
) {
    match session.generate(text, params) {
        Ok(_image) => {
            if preview && !output.json {
                match session.preview(text) {
                    Ok(rendered) => println!("{rendered}"),
                    Err(err) => tracing::warn!("Preview rendering failed: {err}"),
                }
            }
            output.ok("generate", "QR code generated".to_string());
            show_history(session, output);
        }
        Err(err) => output.err("generate", &err),
    }
}

fn run_download(session: &mut QrSession, params: &RenderParameters, output: &Output) {
    match session.download(params) {
        Ok(path) => output.ok("download", format!("QR code saved as {}", path.display())),
        Err(err) => output.err("download", &err),
    }
}

fn run_export(session: &QrSession, output: &Output) {
    match session.export() {
        Ok(path) => output.ok("export", format!("History exported to {}", path.display())),
        Err(err) => output.err("export", &err),
    }
}

fn show_history(session: &QrSession, output: &Output) {
    if output.json {
        let entries: Vec<_> = session
            .recent()
            .iter()
            .map(|entry| {
                json!({
                    "text": entry.text(),
                    "timestamp": entry.timestamp(),
                    "filename": entry.saved_path().map(|p| p.display().to_string()),
                })
            })
            .collect();
        println!("{}", json!({ "ok": true, "action": "history", "recent": entries }));
        return;
    }

    println!("QR Code History (Last {}):", qrforge::RECENT_VIEW_LIMIT);
    for (index, entry) in session.recent().iter().enumerate() {
        println!("{}. {}", index + 1, entry.summary());
    }
}

fn apply_set(params: &mut RenderParameters, rest: &str, output: &Output) {
    let result = match rest.split_once(char::is_whitespace) {
        Some(("size", value)) => value.trim().parse::<BoxScale>().map(|scale| {
            params.scale = scale;
        }),
        Some(("fill", value)) => value.trim().parse::<Color>().map(|color| {
            params.fill = color;
        }),
        Some(("back", value)) => value.trim().parse::<Color>().map(|color| {
            params.back = color;
        }),
        Some(("border", value)) => value
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::Validation(format!("Invalid border '{}'", value.trim())))
            .map(|border| params.set_border(border)),
        _ => Err(Error::Validation(
            "Usage: set size|fill|back|border <value>".to_string(),
        )),
    };

    match result {
        Ok(()) => show_params(params, output),
        Err(err) => output.err("set", &err),
    }
}

fn show_params(params: &RenderParameters, output: &Output) {
    if output.json {
        let payload = json!({
            "ok": true,
            "action": "params",
            "size": params.scale.to_string(),
            "fill": params.fill.to_string(),
            "back": params.back.to_string(),
            "border": params.border(),
        });
        println!("{payload}");
    } else {
        println!(
            "size={} fill={} back={} border={}",
            params.scale,
            params.fill,
            params.back,
            params.border()
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  generate <text>   Generate a QR code and record it in the history");
    println!("  download          Save the latest generation as a PNG");
    println!("  export            Export the full history to CSV");
    println!("  history           Show the last 5 generations");
    println!("  set size <small|medium|large>");
    println!("  set fill <color>  Set the fill color (hex or named)");
    println!("  set back <color>  Set the background color (hex or named)");
    println!("  set border <1-10>");
    println!("  params            Show the current rendering parameters");
    println!("  quit              Exit");
}
