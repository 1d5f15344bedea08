use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xcomsave::{PropertyValue, SaveGame};

#[derive(Parser)]
#[command(name = "xcomsave", about = "XCOM strategy save inspector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a header summary and per-chunk counts
    Info { input: PathBuf },
    /// Dump the full decoded document as JSON
    Dump {
        input: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Compact single-line output
        #[arg(long)]
        compact: bool,
    },
    /// Write the decompressed save body to disk for offline inspection
    Body {
        input: PathBuf,
        #[arg(short, long, default_value = "output.dat")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    match Cli::parse().command {
        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let data = std::fs::read(&input)?;
            let save = SaveGame::decode(&data)?;
            let h = &save.header;

            println!("── XCOM save ────────────────────────────────────────────");
            println!("  Path            {}", input.display());
            println!("  Description     {}", h.save_description);
            println!("  Time            {}", h.time);
            println!("  Map command     {}", h.map_command);
            println!("  Game / save #   {} / {}", h.game_number, h.save_number);
            println!("  Language        {}", h.language);
            println!("  DLC             {}", h.dlc_string);
            println!("  Ironman         {}", h.ironman);
            println!("  Autosave        {}", h.autosave);
            println!("  Tactical        {}", h.tactical_save);
            println!("  CRC             {:08x}", h.crc);
            println!("  Actors          {}", save.actor_table.len());
            println!("  Chunks          {}", save.checkpoint_chunks.len());
            for (i, chunk) in save.checkpoint_chunks.iter().enumerate() {
                let prop_count: usize = chunk
                    .checkpoint_table
                    .iter()
                    .map(|c| c.properties.len())
                    .sum();
                let unknown: usize = chunk
                    .checkpoint_table
                    .iter()
                    .flat_map(|c| &c.properties)
                    .filter(|p| matches!(p.value, PropertyValue::Unknown { .. }))
                    .count();
                println!(
                    "    chunk {i}: {} checkpoint(s), {} properties, {} unknown, map {}",
                    chunk.checkpoint_table.len(),
                    prop_count,
                    unknown,
                    chunk.map_name
                );
            }
        }

        // ── Dump ─────────────────────────────────────────────────────────────
        Commands::Dump {
            input,
            output,
            compact,
        } => {
            let data = std::fs::read(&input)?;
            let save = SaveGame::decode(&data)?;
            let json = if compact {
                serde_json::to_string(&save)?
            } else {
                serde_json::to_string_pretty(&save)?
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        // ── Body ─────────────────────────────────────────────────────────────
        Commands::Body { input, output } => {
            let data = std::fs::read(&input)?;
            let body = SaveGame::decompressed_body(&data)?;
            std::fs::write(&output, &body)?;
            println!("Wrote {} bytes to {}", body.len(), output.display());
        }
    }

    Ok(())
}
