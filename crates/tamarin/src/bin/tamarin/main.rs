mod cli;

use tamarin::context::Context;
use tamarin::documents::Documents;
use tamarin::replace::Replacer;
use tamarin::value::Value;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TAMARIN_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Render(render_cli) => render(render_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn render(cli: cli::RenderCommand) -> anyhow::Result<()> {
    let documents = load(&cli.input)?;
    let mut tree = documents.cascade(&cli.file_name)?;

    let context = context(&cli.vars, &cli.file_name)?;
    let rewritten = Replacer::default().replace(&mut tree, &context);
    tracing::debug!(rewritten, "placeholders resolved");

    output(&cli.output, &tree.to_value()?)?;
    Ok(())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<Documents> {
    let directory = match &input.directory {
        Some(directory) => directory.clone(),
        None => std::env::current_dir()?,
    };

    let mut documents = Documents::default();
    documents.load_directory(&directory)?;
    Ok(documents)
}

fn context(vars: &cli::VarArgs, file_name: &str) -> anyhow::Result<Context> {
    let vars_file = vars
        .vars_file
        .as_deref()
        .map(tamarin::documents::load_yaml)
        .transpose()?;

    Ok(Context::for_file(file_name, vars_file, &vars.vars)?)
}

fn output(output: &cli::OutputArgs, value: &Value) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}

/// (tamarin-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    let documents = load(&cli.input)?;

    match cli.command {
        Files => {
            for file_name in documents.file_names() {
                println!("{file_name}");
                for path in documents.candidates(file_name) {
                    println!("  {}", path.display());
                }
            }
        }
        Tree { file_name } => println!("{}", documents.cascade(&file_name)?),
    }

    Ok(())
}
