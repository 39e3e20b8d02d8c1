//! fxlib CLI - Tool for inspecting particle-effect library documents.

use fxlib::core::{AttributeCurve, AttributeKey, CurveTable};
use fxlib::effect::{EffectDescriptor, EmitterDescriptor};
use fxlib::loader::EffectLoader;
use fxlib::xml::{XmlDocument, XmlSource};
use fxlib::{EffectLibrary, Error, LoadOptions};
use rayon::prelude::*;
use std::env;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Verbosity level
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    Quiet,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Info => "warn,fxlib=info,fxlib_cli=info",
            Verbosity::Debug => "fxlib=debug,fxlib_cli=debug",
            Verbosity::Trace => "fxlib=trace,fxlib_cli=trace",
        }
    }
}

/// `FXLIB_LOG` takes precedence over the command-line verbosity.
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env("FXLIB_LOG").unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut verbosity = Verbosity::Info;
    let mut opts = LoadOptions::default();
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => verbosity = Verbosity::Debug,
            "-vv" | "--trace" => verbosity = Verbosity::Trace,
            "-q" | "--quiet" => verbosity = Verbosity::Quiet,
            "--no-mmap" => opts.use_mmap = false,
            _ => filtered_args.push(arg),
        }
    }

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let json_mode = filtered_args.iter().any(|&s| s == "--json" || s == "-j");
    init_logging(if json_mode { Verbosity::Quiet } else { verbosity });

    match filtered_args[0] {
        // Info command - counts and layout
        "info" | "i" => {
            let file = require_file(&filtered_args, "info <file>");
            cmd_info(file, &opts);
        }

        // Tree command - show hierarchy
        "tree" | "t" => {
            let file = require_file(&filtered_args, "tree <file>");
            cmd_tree(file, &opts);
        }

        // Shapes command - list sprite declarations
        "shapes" | "s" => {
            let file = require_file(&filtered_args, "shapes <file>");
            cmd_shapes(file, &opts);
        }

        // Dump command - curves of matching nodes
        "dump" | "d" => {
            let file = require_file(&filtered_args, "dump <file> [pattern] [--json]");
            let pattern = filtered_args
                .get(2)
                .filter(|&&s| s != "--json" && s != "-j")
                .copied();
            cmd_dump(file, pattern, json_mode, &opts);
        }

        // Check command - load many files in parallel
        "check" | "c" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: fxlib-cli check <file>...");
                std::process::exit(1);
            }
            cmd_check(&filtered_args[1..], &opts);
        }

        "version" | "-V" | "--version" => {
            println!(
                "fxlib {} (built {} {})",
                env!("CARGO_PKG_VERSION"),
                env!("FXLIB_BUILD_DATE"),
                env!("FXLIB_BUILD_TIME")
            );
        }

        // Help
        "help" | "h" | "-h" | "--help" => print_help(),

        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(filtered_args[0]).exists() {
                cmd_info(filtered_args[0], &opts);
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    }
}

fn require_file<'a>(args: &[&'a str], usage: &str) -> &'a str {
    match args.get(1) {
        Some(file) => file,
        None => {
            eprintln!("Error: missing file argument");
            eprintln!("Usage: fxlib-cli {}", usage);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("fxlib-cli - particle effect library inspector");
    println!();
    println!("USAGE:");
    println!("    fxlib-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file>              Show layout and object counts");
    println!("    t, tree   <file>              Show folders, effects, emitters and sub-effects");
    println!("    s, shapes <file>              List sprite declarations");
    println!("    d, dump   <file> [pattern]    Dump curves of nodes whose path contains pattern");
    println!("    c, check  <file>...           Load several files in parallel and report status");
    println!("    version                       Show version and build date");
    println!("    h, help                       Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Suppress log output");
    println!("    -j, --json       JSON output (dump)");
    println!("    --no-mmap        Read files instead of memory-mapping them");
    println!();
    println!("ENVIRONMENT:");
    println!("    FXLIB_LOG        Log filter, e.g. 'fxlib=trace' (overrides -v/-q)");
    println!();
    println!("EXAMPLES:");
    println!("    fxlib-cli info fire.xml");
    println!("    fxlib-cli tree fire.xml");
    println!("    fxlib-cli dump fire.xml Fire/Flame --json");
    println!("    fxlib-cli check libs/*.xml");
}

fn load_or_exit(path: &str, opts: &LoadOptions) -> EffectLibrary {
    info!("Opening library: {}", path);
    let mut lib = EffectLibrary::new();
    match lib.load_file(path, opts) {
        Ok(stats) => {
            debug!("Loaded {} shapes, {} effects", stats.shapes, stats.effects);
            lib
        }
        Err(e) => {
            eprintln!("Failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn cmd_info(path: &str, opts: &LoadOptions) {
    info!("Opening library: {}", path);

    let source = match XmlSource::open_opts(path, opts.use_mmap) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open {}: {}", path, e);
            std::process::exit(1);
        }
    };
    let parsed = source.parse();

    let mut loader = EffectLoader::new(opts.shape_offset.unwrap_or(0));
    if loader.open_parsed(parsed.as_ref().map(XmlDocument::root).map_err(Error::clone)).is_err() {
        eprintln!("Failed to open {}: {}", path, loader.last_error());
        std::process::exit(1);
    }
    let layout = loader.layout();

    let sprites: Vec<_> = loader.shapes().collect();
    let mut counts = TreeCounts::default();
    while let Ok(effect) = loader.next_effect(&sprites) {
        counts.add_effect(&effect, &sprites);
    }
    debug!("Enumeration ended: {}", loader.last_error());

    println!("Library: {}", path);
    println!("Mapped:  {}", source.is_mapped());
    if let Some(layout) = layout {
        println!("Layout:  {:?}", layout);
    }
    println!();
    println!("Shapes:      {}", sprites.len());
    println!("Effects:     {}", counts.effects);
    println!("Sub-effects: {}", counts.sub_effects);
    println!("Emitters:    {}", counts.emitters);
    if counts.unresolved > 0 {
        println!("  without sprite: {}", counts.unresolved);
    }
    println!("Keyframes:   {}", counts.keys);
}

/// Node counts for info
#[derive(Default)]
struct TreeCounts {
    effects: usize,
    sub_effects: usize,
    emitters: usize,
    unresolved: usize,
    keys: usize,
}

impl TreeCounts {
    fn add_effect(&mut self, effect: &EffectDescriptor, sprites: &[fxlib::core::SpriteDescriptor]) {
        if effect.is_sub_effect() {
            self.sub_effects += 1;
        } else {
            self.effects += 1;
        }
        self.keys += effect.curves.num_keys();
        for emitter in &effect.emitters {
            self.emitters += 1;
            self.keys += emitter.curves.num_keys();
            if emitter.sprite(sprites).is_none() {
                self.unresolved += 1;
            }
            if let Some(sub) = emitter.sub_effect.as_deref() {
                self.add_effect(sub, sprites);
            }
        }
    }
}

fn cmd_tree(path: &str, opts: &LoadOptions) {
    let lib = load_or_exit(path, opts);

    println!("Library: {}", path);
    println!();

    let mut folder: Option<&str> = None;
    for effect in lib.effects() {
        let effect_folder = effect.folder();
        if effect_folder != folder {
            if let Some(f) = effect_folder {
                println!("{}/", f);
            }
            folder = effect_folder;
        }
        let depth = usize::from(folder.is_some());
        print_effect(&lib, effect, depth);
    }
}

fn print_effect(lib: &EffectLibrary, effect: &EffectDescriptor, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}{} [effect, {} emitters]", indent, effect.name, effect.emitters.len());
    for emitter in &effect.emitters {
        print_emitter(lib, emitter, depth + 1);
    }
}

fn print_emitter(lib: &EffectLibrary, emitter: &EmitterDescriptor, depth: usize) {
    let indent = "  ".repeat(depth);
    let sprite = lib.sprite_for(emitter).map(|s| s.name()).unwrap_or("-");
    println!("{}{} [emitter, sprite: {}]", indent, emitter.name, sprite);
    if let Some(sub) = emitter.sub_effect.as_deref() {
        print_effect(lib, sub, depth + 1);
    }
}

fn cmd_shapes(path: &str, opts: &LoadOptions) {
    let lib = load_or_exit(path, opts);

    println!("Library: {}", path);
    println!("Shapes ({}):", lib.sprites().len());
    for s in lib.sprites() {
        println!(
            "  [{:>4}] {} {}x{} frames={} radius={:.2}",
            s.index, s.filename, s.width, s.height, s.frames, s.max_radius
        );
    }
}

fn cmd_dump(path: &str, pattern: Option<&str>, json_mode: bool, opts: &LoadOptions) {
    let lib = load_or_exit(path, opts);
    let matches = |p: &str| pattern.map(|pat| p.contains(pat)).unwrap_or(true);

    if json_mode {
        let mut nodes = Vec::new();
        for effect in lib.effects() {
            collect_dump_json(&lib, effect, &matches, &mut nodes);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "library": path,
                "nodes": nodes
            }))
            .unwrap_or_default()
        );
    } else {
        println!("Library: {}", path);
        println!(
            "Curve Dump{}",
            if let Some(p) = pattern { format!(" (filter: {})", p) } else { String::new() }
        );
        println!();
        for effect in lib.effects() {
            dump_effect(&lib, effect, &matches);
        }
    }
}

fn dump_effect(lib: &EffectLibrary, effect: &EffectDescriptor, matches: &dyn Fn(&str) -> bool) {
    if matches(&effect.path) {
        println!("[EFFECT] {}", effect.path);
        dump_curves(&effect.curves);
        println!();
    }
    for emitter in &effect.emitters {
        if matches(&emitter.path) {
            let sprite = lib.sprite_for(emitter).map(|s| s.filename.as_str()).unwrap_or("-");
            println!("[EMITTER] {} (sprite: {})", emitter.path, sprite);
            dump_curves(&emitter.curves);
            println!();
        }
        if let Some(sub) = emitter.sub_effect.as_deref() {
            dump_effect(lib, sub, matches);
        }
    }
}

fn dump_curves<K: AttributeKey>(table: &CurveTable<K>) {
    for (key, curve) in table.iter() {
        let keys: Vec<String> = curve
            .iter()
            .map(|k| match k.handle {
                Some(h) => format!("{}:{} ~({}, {} | {}, {})", k.frame, k.value, h.left.x, h.left.y, h.right.x, h.right.y),
                None => format!("{}:{}", k.frame, k.value),
            })
            .collect();
        println!("  {:<24} {}", key.tag(), keys.join("  "));
    }
}

fn collect_dump_json(
    lib: &EffectLibrary,
    effect: &EffectDescriptor,
    matches: &dyn Fn(&str) -> bool,
    out: &mut Vec<serde_json::Value>,
) {
    if matches(&effect.path) {
        out.push(serde_json::json!({
            "type": "effect",
            "name": effect.name,
            "path": effect.path,
            "parent": effect.parent_emitter,
            "curves": curves_json(&effect.curves)
        }));
    }
    for emitter in &effect.emitters {
        if matches(&emitter.path) {
            out.push(serde_json::json!({
                "type": "emitter",
                "name": emitter.name,
                "path": emitter.path,
                "sprite": lib.sprite_for(emitter).map(|s| s.filename.as_str()),
                "curves": curves_json(&emitter.curves)
            }));
        }
        if let Some(sub) = emitter.sub_effect.as_deref() {
            collect_dump_json(lib, sub, matches, out);
        }
    }
}

fn curves_json<K: AttributeKey>(table: &CurveTable<K>) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = table
        .iter()
        .map(|(key, curve)| (key.tag().to_string(), curve_json(curve)))
        .collect();
    serde_json::Value::Object(map)
}

fn curve_json(curve: &AttributeCurve) -> serde_json::Value {
    let keys: Vec<serde_json::Value> = curve
        .iter()
        .map(|k| {
            serde_json::json!({
                "frame": k.frame,
                "value": k.value,
                "handle": k.handle.map(|h| [h.left.x, h.left.y, h.right.x, h.right.y])
            })
        })
        .collect();
    serde_json::Value::Array(keys)
}

fn cmd_check(paths: &[&str], opts: &LoadOptions) {
    info!("Checking {} files", paths.len());

    // One library (and loader) per file; nothing is shared between them.
    let results: Vec<(&str, Result<fxlib::LoadStats, Error>)> = paths
        .par_iter()
        .map(|&path| {
            let mut lib = EffectLibrary::new();
            (path, lib.load_file(path, opts))
        })
        .collect();

    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(stats) => println!(
                "OK    {} ({} shapes, {} effects, {} emitters)",
                path, stats.shapes, stats.effects, stats.emitters
            ),
            Err(e) => {
                failed += 1;
                println!("FAIL  {}: {}", path, e);
            }
        }
    }

    println!();
    println!("{} ok, {} failed", results.len() - failed, failed);
    if failed > 0 {
        std::process::exit(1);
    }
}
