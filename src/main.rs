use clap::{Parser, Subcommand};
use estream::cli::{
    generate_key_material, show_bench, show_key_material, show_keystream, show_keystream_json,
    show_stats, xor_file, BenchOptions, KeystreamOptions, XorOptions,
};
use estream::Algorithm;
use std::path::PathBuf;
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("ESTREAM_VERSION");
const PROFILE: &str = env!("ESTREAM_PROFILE");
const GIT_HASH: &str = env!("ESTREAM_GIT_HASH");

/// Hex-decoded bytes. An alias so clap parses one value rather than many.
type HexBytes = Vec<u8>;

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} ({})", PROFILE, VERSION, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "estream")]
#[command(author, about = "HC-128, HC-256 and Rabbit stream ciphers", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print keystream bytes for a key and IV
    #[command(alias = "ks")]
    Keystream {
        /// Cipher: hc128, hc256 or rabbit
        #[arg(long, short, default_value = "hc128", value_parser = parse_algorithm)]
        algorithm: Algorithm,

        /// Key as hex
        #[arg(long, value_parser = parse_hex)]
        key: HexBytes,

        /// IV as hex (may be omitted for rabbit)
        #[arg(long, value_parser = parse_hex)]
        iv: Option<HexBytes>,

        /// Keystream bytes to skip
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Keystream bytes to print
        #[arg(long, default_value = "64")]
        length: usize,

        /// Emit JSON instead of hex rows
        #[arg(long)]
        json: bool,
    },

    /// Encrypt or decrypt a file (the operation is its own inverse)
    #[command(alias = "x", visible_aliases = ["encrypt", "decrypt"])]
    Xor {
        #[arg(long, short, default_value = "hc128", value_parser = parse_algorithm)]
        algorithm: Algorithm,

        /// Key as hex
        #[arg(long, value_parser = parse_hex)]
        key: HexBytes,

        /// IV as hex (may be omitted for rabbit)
        #[arg(long, value_parser = parse_hex)]
        iv: Option<HexBytes>,

        /// Read size in bytes
        #[arg(long, default_value = "65536")]
        chunk_size: usize,

        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,
    },

    /// Generate a random key and IV
    #[command(alias = "k")]
    Keygen {
        #[arg(long, short, default_value = "hc128", value_parser = parse_algorithm)]
        algorithm: Algorithm,

        /// Omit the IV (rabbit only)
        #[arg(long)]
        no_iv: bool,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Measure setup time and throughput
    #[command(alias = "b")]
    Bench {
        /// Ciphers to measure (defaults to all)
        #[arg(long, short, value_parser = parse_algorithm)]
        algorithm: Vec<Algorithm>,

        /// Number of 1 KB transforms per cipher
        #[arg(long, default_value = "16384")]
        iterations: usize,
    },

    /// Statistical summary of a keystream sample
    #[command(alias = "s")]
    Stats {
        #[arg(long, short, default_value = "hc128", value_parser = parse_algorithm)]
        algorithm: Algorithm,

        /// Key as hex (defaults to all zero)
        #[arg(long, value_parser = parse_hex)]
        key: Option<HexBytes>,

        /// IV as hex (defaults to all zero)
        #[arg(long, value_parser = parse_hex)]
        iv: Option<HexBytes>,

        /// Keystream bytes to skip
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Sample size in bytes
        #[arg(long, default_value = "1048576")]
        length: usize,
    },
}

fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_hex(s: &str) -> Result<HexBytes, String> {
    hex::decode(s.trim()).map_err(|e| format!("{}", e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("estream {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Keystream {
            algorithm,
            key,
            iv,
            offset,
            length,
            json,
        } => {
            let options = KeystreamOptions {
                algorithm,
                key,
                iv: iv.unwrap_or_default(),
                offset,
                length,
            };
            let rendered = if json {
                show_keystream_json(&options).map(|s| s + "\n")
            } else {
                show_keystream(&options)
            };
            rendered.map(|text| print!("{}", text))
        }

        Commands::Xor {
            algorithm,
            key,
            iv,
            chunk_size,
            input,
            output,
        } => {
            let options = XorOptions {
                algorithm,
                key,
                iv: iv.unwrap_or_default(),
                chunk_size,
            };
            xor_file(&input, &output, &options).map(|bytes| {
                println!("Processed {} bytes into {}", bytes, output.display());
            })
        }

        Commands::Keygen {
            algorithm,
            no_iv,
            json,
        } => {
            if no_iv && algorithm != Algorithm::Rabbit {
                Err(estream::EstreamError::InvalidOption(format!(
                    "{} requires an IV",
                    algorithm
                )))
            } else {
                let material = generate_key_material(algorithm, !no_iv, &mut rand::thread_rng());
                if json {
                    serde_json::to_string_pretty(&material)
                        .map(|s| println!("{}", s))
                        .map_err(Into::into)
                } else {
                    print!("{}", show_key_material(&material));
                    Ok(())
                }
            }
        }

        Commands::Bench {
            algorithm,
            iterations,
        } => {
            let options = BenchOptions {
                algorithms: if algorithm.is_empty() {
                    Algorithm::ALL.to_vec()
                } else {
                    algorithm
                },
                iterations,
            };
            show_bench(&options).map(|table| print!("{}", table))
        }

        Commands::Stats {
            algorithm,
            key,
            iv,
            offset,
            length,
        } => {
            let options = KeystreamOptions {
                algorithm,
                key: key.unwrap_or_else(|| vec![0u8; algorithm.key_len()]),
                iv: iv.unwrap_or_else(|| vec![0u8; algorithm.iv_len()]),
                offset,
                length,
            };
            show_stats(&options).map(|report| print!("{}", report))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
