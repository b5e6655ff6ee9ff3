use clap::{Args as ClapArgs, Parser, Subcommand};
use nestconf_core::{Document, ExportOptions, ParseOptions, Request};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "nestconf",
    about = "Format, dump and query nested INI-style configuration files",
    version
)]
struct Cli {
    /// Log parser activity (debug level) to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Rewrite a file in canonical form; prints or writes with --out
    Fmt(FmtArgs),
    /// Dump the section tree as JSON
    Dump(LoadArgs),
    /// Look up a value, optionally casting it
    Get(GetArgs),
    /// Parse a file, or every matching file under a directory
    Check(CheckArgs),
}

#[derive(ClapArgs, Debug)]
struct LoadArgs {
    /// Configuration file
    path: PathBuf,
    /// Accept headers whose closing brackets do not match the opening count
    #[arg(long, default_value_t = false)]
    lenient: bool,
}

#[derive(ClapArgs, Debug)]
struct FmtArgs {
    #[command(flatten)]
    load: LoadArgs,
    /// Optional output path; otherwise prints to stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// Prefix the output with a generation timestamp comment
    #[arg(long, default_value_t = false)]
    stamp: bool,
}

#[derive(ClapArgs, Debug)]
struct GetArgs {
    #[command(flatten)]
    load: LoadArgs,
    /// Section path from the root, one flag per level (e.g. --section c --section d)
    #[arg(long = "section", short = 's')]
    sections: Vec<String>,
    /// Key within the selected section
    #[arg(long, short = 'k')]
    key: String,
    /// Cast to int, long, ulong, float, double, bool or string; append [] for arrays
    #[arg(long = "as", value_name = "KIND")]
    kind: Option<Request>,
}

#[derive(ClapArgs, Debug)]
struct CheckArgs {
    /// File or directory to check
    path: PathBuf,
    /// File extensions to match when walking a directory
    #[arg(long, value_delimiter = ',', default_values_t = ["cfg".to_string(), "ini".to_string(), "conf".to_string()])]
    ext: Vec<String>,
    #[arg(long, default_value_t = false)]
    lenient: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    match cli.cmd {
        Cmd::Fmt(a) => cmd_fmt(a),
        Cmd::Dump(a) => cmd_dump(a),
        Cmd::Get(a) => cmd_get(a),
        Cmd::Check(a) => cmd_check(a),
    }
}

fn parse_opts(lenient: bool) -> ParseOptions {
    ParseOptions {
        strict_headers: !lenient,
    }
}

fn load(args: &LoadArgs) -> Document {
    nestconf_core::parse_file(&args.path, &parse_opts(args.lenient)).unwrap_or_else(|e| {
        eprintln!("error: {}: {}", args.path.display(), e);
        std::process::exit(2);
    })
}

fn cmd_fmt(args: FmtArgs) {
    let doc = load(&args.load);
    let opts = ExportOptions {
        banner: args.stamp.then(|| {
            format!(
                "generated {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            )
        }),
    };
    let text = nestconf_core::export_to_string(&doc, &opts);
    if let Some(out) = args.out {
        std::fs::write(&out, text).unwrap_or_else(|e| {
            eprintln!("error writing {}: {}", out.display(), e);
            std::process::exit(5);
        });
    } else {
        print!("{}", text);
    }
}

fn cmd_dump(args: LoadArgs) {
    let doc = load(&args);
    print!("{}", nestconf_core::dump_json(&doc));
}

fn cmd_get(args: GetArgs) {
    let doc = load(&args.load);
    let Some(sec) = doc.find_section(args.sections.iter().map(String::as_str)) else {
        eprintln!("section not found: {}", args.sections.join("/"));
        std::process::exit(3);
    };
    let Some(raw) = sec.get(&args.key) else {
        eprintln!("key not found: {}", args.key);
        std::process::exit(3);
    };
    match args.kind {
        None => println!("{}", raw),
        Some(req) => match nestconf_core::cast_as(raw, req) {
            Ok(v) => println!("{}", serde_json::Value::from(&v)),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(4);
            }
        },
    }
}

fn find_config_files(dir: &Path, exts: &[String]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).into_iter().flatten() {
        let p = entry.path();
        if p.is_file()
            && let Some(ext) = p.extension().and_then(|s| s.to_str())
            && exts.iter().any(|e| e == ext)
        {
            out.push(p.to_path_buf());
        }
    }
    out.sort();
    out
}

fn cmd_check(args: CheckArgs) {
    let p = args.path.as_path();
    let files = if p.is_file() {
        vec![p.to_path_buf()]
    } else if p.is_dir() {
        find_config_files(p, &args.ext)
    } else {
        eprintln!("not found: {}", p.display());
        std::process::exit(2);
    };
    let opts = parse_opts(args.lenient);
    let mut failed = 0usize;
    for f in &files {
        match nestconf_core::parse_file(f, &opts) {
            Ok(doc) => println!("ok\t{}\t({} sections)", f.display(), doc.section_count() - 1),
            Err(e) => {
                failed += 1;
                println!("error\t{}\t{}", f.display(), e);
            }
        }
    }
    log::debug!("checked {} files, {} failed", files.len(), failed);
    if failed > 0 {
        std::process::exit(2);
    }
}
