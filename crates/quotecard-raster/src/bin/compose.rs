use std::env;
use std::process::ExitCode;

use quotecard::{
    builtin_quote, download_file_name_now, BackgroundMode, PresentationState, Rgba, SharePayload,
};
use quotecard_raster::{decode_background, export_card_default};
use quotecard_render::{ExportProfile, ProfileId};

#[derive(Clone, Debug)]
struct Args {
    quote: Option<String>,
    author: Option<String>,
    builtin: usize,
    profile: ProfileId,
    font_size_px: f32,
    font_family: String,
    bg_color: Rgba,
    quote_color: Rgba,
    author_color: Rgba,
    bg_image: Option<String>,
    bg_mode: BackgroundMode,
    page_url: Option<String>,
    out_dir: String,
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let cfg = parse_args(args)?;
    std::fs::create_dir_all(&cfg.out_dir).map_err(|e| e.to_string())?;

    let fallback = builtin_quote(cfg.builtin);
    let quote_text = cfg
        .quote
        .clone()
        .unwrap_or_else(|| fallback.display_text());
    let author_text = cfg
        .author
        .clone()
        .unwrap_or_else(|| fallback.display_author());

    let background_image = match cfg.bg_image.as_deref() {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| format!("unable to read {}: {}", path, e))?;
            // Decode failure degrades to a plain color fill, same as
            // the widget.
            decode_background(&bytes)
        }
        None => None,
    };

    let state = PresentationState {
        quote_text,
        author_text,
        font_family: cfg.font_family.clone(),
        base_font_size_px: cfg.font_size_px,
        quote_color: cfg.quote_color,
        author_color: cfg.author_color,
        background_color: cfg.bg_color,
        background_image,
        background_mode: cfg.bg_mode,
    };

    let profile = ExportProfile::for_id(cfg.profile);
    let result = export_card_default(&state, profile).map_err(|e| e.to_string())?;

    let file_name = download_file_name_now();
    let file_path = format!("{}/{}", cfg.out_dir, file_name);
    std::fs::write(&file_path, &result.png).map_err(|e| e.to_string())?;
    println!(
        "wrote {} ({}x{}, {} bytes)",
        file_path,
        result.width,
        result.height,
        result.png.len()
    );

    if let (ProfileId::Share, Some(page_url)) = (cfg.profile, cfg.page_url.as_deref()) {
        let payload = SharePayload::new(&state.quote_text, &state.author_text, page_url);
        let intent = payload.intent_url().map_err(|e| e.to_string())?;
        println!("share intent: {}", intent);
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h") {
        return Err("help requested".to_string());
    }

    let mut cfg = Args {
        quote: None,
        author: None,
        builtin: 4,
        profile: ProfileId::Download,
        font_size_px: 28.0,
        font_family: "sans-serif".to_string(),
        bg_color: Rgba::BACKGROUND,
        quote_color: Rgba::QUOTE_INK,
        author_color: Rgba::AUTHOR_INK,
        bg_image: None,
        bg_mode: BackgroundMode::Cover,
        page_url: None,
        out_dir: "target/compose-out".to_string(),
    };

    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--quote" => {
                cfg.quote = Some(required_value(&args, i, "--quote")?);
                i += 2;
            }
            "--author" => {
                cfg.author = Some(required_value(&args, i, "--author")?);
                i += 2;
            }
            "--builtin" => {
                let v = required_value(&args, i, "--builtin")?;
                cfg.builtin = v
                    .parse::<usize>()
                    .map_err(|_| format!("invalid --builtin value '{}'", v))?;
                i += 2;
            }
            "--profile" => {
                let v = required_value(&args, i, "--profile")?;
                cfg.profile = match v.to_ascii_lowercase().as_str() {
                    "share" => ProfileId::Share,
                    "download" => ProfileId::Download,
                    _ => return Err(format!("invalid --profile value '{}'", v)),
                };
                i += 2;
            }
            "--font-size" => {
                let v = required_value(&args, i, "--font-size")?;
                cfg.font_size_px = v
                    .parse::<f32>()
                    .map_err(|_| format!("invalid --font-size value '{}'", v))?;
                i += 2;
            }
            "--font-family" => {
                cfg.font_family = required_value(&args, i, "--font-family")?;
                i += 2;
            }
            "--bg-color" => {
                cfg.bg_color = parse_color(&required_value(&args, i, "--bg-color")?)?;
                i += 2;
            }
            "--quote-color" => {
                cfg.quote_color = parse_color(&required_value(&args, i, "--quote-color")?)?;
                i += 2;
            }
            "--author-color" => {
                cfg.author_color = parse_color(&required_value(&args, i, "--author-color")?)?;
                i += 2;
            }
            "--bg-image" => {
                cfg.bg_image = Some(required_value(&args, i, "--bg-image")?);
                i += 2;
            }
            "--bg-mode" => {
                let v = required_value(&args, i, "--bg-mode")?;
                cfg.bg_mode = BackgroundMode::parse(&v)
                    .ok_or_else(|| format!("invalid --bg-mode value '{}'", v))?;
                i += 2;
            }
            "--page-url" => {
                cfg.page_url = Some(required_value(&args, i, "--page-url")?);
                i += 2;
            }
            "--out" => {
                cfg.out_dir = required_value(&args, i, "--out")?;
                i += 2;
            }
            other => return Err(format!("unknown option '{}'", other)),
        }
    }

    if cfg.font_size_px <= 0.0 {
        return Err("--font-size must be > 0".to_string());
    }
    Ok(cfg)
}

fn required_value(args: &[String], i: usize, flag: &str) -> Result<String, String> {
    args.get(i + 1)
        .cloned()
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_color(value: &str) -> Result<Rgba, String> {
    Rgba::from_hex(value).map_err(|e| format!("invalid color '{}': {}", value, e))
}

fn help_text() -> &'static str {
    r#"compose - render a quote card to a PNG file

USAGE:
  cargo run -p quotecard-raster --bin compose -- [options]

OPTIONS:
  --quote <text>        quote text (default: built-in catalog entry)
  --author <text>       author text (default: built-in catalog entry)
  --builtin <n>         built-in catalog index (default: 4)
  --profile <p>         share|download (default: download)
  --font-size <px>      base font size in px (default: 28)
  --font-family <name>  font family hint (default: sans-serif)
  --bg-color <#hex>     background color (default: #ffffff)
  --quote-color <#hex>  quote ink (default: #0b0c0f)
  --author-color <#hex> author ink (default: #666a74)
  --bg-image <path>     background image file (png/jpeg)
  --bg-mode <mode>      cover|repeat (default: cover)
  --page-url <url>      with --profile share, print the tweet intent link
  --out <dir>           output directory (default: target/compose-out)
"#
}
