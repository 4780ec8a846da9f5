//! Command-line interface for xmlrender

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xmlrender::{DateFormat, PartialConfig, Renderer, Schema, Value};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xmlrender")]
#[command(author, version, about = "Render JSON data as shaped XML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a JSON document as XML
    Render {
        /// Path to the JSON file to render, or "-" for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON configuration overlay (camelCase keys)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// JSON schema file
        #[arg(short, long, value_name = "SCHEMA")]
        schema: Option<PathBuf>,

        /// Schema type of the root value
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,

        /// Root element name
        #[arg(short, long)]
        root: Option<String>,

        /// Write an XML declaration
        #[arg(long)]
        manifest: bool,

        /// Write array entries as siblings instead of inside a wrapper
        #[arg(long)]
        unwrapped_arrays: bool,

        /// Keep array keys as entry names instead of singularizing them
        #[arg(long)]
        no_singularize: bool,

        /// Indentation width
        #[arg(short, long)]
        indent: Option<usize>,

        /// Date format: ISO, SQL or JS
        #[arg(short, long)]
        date_format: Option<String>,

        /// Treat RFC 3339 strings as dates
        #[arg(long)]
        parse_dates: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the types declared by a schema file
    Schema {
        /// Path to the JSON schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            file,
            config,
            schema,
            type_name,
            root,
            manifest,
            unwrapped_arrays,
            no_singularize,
            indent,
            date_format,
            parse_dates,
            output,
        } => {
            let overrides = PartialConfig {
                manifest: manifest.then_some(true),
                unwrapped_arrays: unwrapped_arrays.then_some(true),
                singularize_children: no_singularize.then_some(false),
                indent,
                date_format: date_format.map(DateFormat::from),
                ..PartialConfig::default()
            };
            cmd_render(RenderArgs {
                file,
                config,
                schema,
                type_name,
                root,
                overrides,
                parse_dates,
                output,
            })
        }
        Commands::Schema { schema, json } => cmd_schema(schema, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
struct RenderArgs {
    file: PathBuf,
    config: Option<PathBuf>,
    schema: Option<PathBuf>,
    type_name: Option<String>,
    root: Option<String>,
    overrides: PartialConfig,
    parse_dates: bool,
    output: Option<PathBuf>,
}

#[cfg(feature = "cli")]
fn cmd_render(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut renderer = Renderer::new();
    if let Some(path) = &args.config {
        renderer.configure(PartialConfig::from_file(path)?);
    }
    if let Some(path) = &args.schema {
        renderer.configure(PartialConfig {
            schema: Some(Some(Schema::from_file(path)?)),
            ..PartialConfig::default()
        });
    }
    renderer.configure(args.overrides);

    let text = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.file)?
    };
    let json: serde_json::Value = serde_json::from_str(&text)?;
    let value = if args.parse_dates {
        Value::from_json_with_dates(json)
    } else {
        Value::from(json)
    };

    let xml = renderer.render_as(&value, args.type_name.as_deref(), args.root.as_deref())?;

    if let Some(output_path) = args.output {
        fs::write(&output_path, format!("{}\n", xml))?;
        eprintln!("Output written to: {}", output_path.display());
    } else {
        println!("{}", xml);
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_schema(schema_path: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let schema = Schema::from_file(&schema_path)?;

    if json_output {
        let types: serde_json::Map<String, serde_json::Value> = schema
            .types()
            .map(|(name, rule)| {
                let elements: Vec<_> = rule
                    .ordered_elements()
                    .iter()
                    .map(|e| serde_json::json!({"name": e.name(), "type": e.sub_type()}))
                    .collect();
                let info = serde_json::json!({
                    "includeNamedOnly": rule.include_named_only(),
                    "validAttributes": rule.valid_attributes(),
                    "elements": elements,
                });
                (name.to_string(), info)
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }

    println!("xmlrender v{}", xmlrender::VERSION);
    println!("Schema: {}", schema_path.display());
    println!("Types: {}", schema.len());

    for (name, rule) in schema.types() {
        println!("\n=== {} ===", name);
        if rule.include_named_only() {
            println!("  named elements only");
        }
        if let Some(allowed) = rule.valid_attributes() {
            let names: Vec<&str> = allowed.iter().map(String::as_str).collect();
            println!("  attributes: {}", names.join(", "));
        }
        for element in rule.ordered_elements() {
            match element.sub_type() {
                Some(sub_type) => println!("  {} : {}", element.name(), sub_type),
                None => println!("  {}", element.name()),
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    std::process::exit(1);
}
