use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cdma_tool::plot::{PngPlot, TraceSink};
use cdma_tool::{Codec, Config, NoiseConfig, SpreadingCode, UserConfig, DEFAULT_THRESHOLD};

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
enum Mode {
    /// Spread, superpose, add noise and despread every user
    Simulate,
    /// Print the cross-correlation table of the users' codes
    Codes,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CodecArg {
    Utf8,
    Latin1,
}

impl From<CodecArg> for Codec {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::Utf8 => Codec::Utf8,
            CodecArg::Latin1 => Codec::Latin1,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cdma_tool", version, about)]
struct Args {
    #[arg(long, value_enum, default_value_t = Mode::Simulate)]
    mode: Mode,

    /// User stream as TEXT:CODE (code in 0b.., 0x.. or decimal). Repeatable.
    /// All texts must encode to the same number of bytes.
    #[arg(long = "user", value_name = "TEXT:CODE")]
    users: Vec<UserConfig>,

    /// Byte confidence threshold (sum of squared bit correlations).
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    threshold: f64,

    /// Standard deviation of the additive Gaussian noise.
    #[arg(long, default_value_t = 0.3)]
    noise_std: f64,

    /// Mean of the additive Gaussian noise.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    noise_mean: f64,

    /// Noise RNG seed; system entropy when absent.
    #[arg(long, env = "CDMA_SEED")]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = CodecArg::Utf8)]
    codec: CodecArg,

    /// Write the (bit, correlation) trace of one user to this PNG.
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Index of the plotted user.
    #[arg(long, default_value_t = 0)]
    plot_user: usize,

    /// Log filter, overrides RUST_LOG (e.g. debug, cdma_tool=trace).
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            users: if self.users.is_empty() {
                defaults.users
            } else {
                self.users
            },
            threshold: self.threshold,
            noise: NoiseConfig {
                mean: self.noise_mean,
                std_dev: self.noise_std,
                seed: self.seed,
            },
            codec: self.codec.into(),
            plot: self.plot,
            plot_user: self.plot_user,
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_code_table(codes: &[SpreadingCode]) {
    print!("{:>12}", "");
    for code in codes {
        print!("{:>12}", code.to_string());
    }
    println!();
    for a in codes {
        print!("{:>12}", a.to_string());
        for b in codes {
            print!("{:>12}", a.cross_correlation(b));
        }
        println!();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let mode = args.mode;
    let config = args.into_config();
    config.validate()?;

    //----------------------------------------------------------
    // MODE: CODES
    //----------------------------------------------------------
    if mode == Mode::Codes {
        let codes: Vec<SpreadingCode> = config.users.iter().map(|u| u.code).collect();
        print_code_table(&codes);
        return Ok(());
    }

    //----------------------------------------------------------
    // MODE: SIMULATE
    //----------------------------------------------------------
    info!(
        users = config.users.len(),
        threshold = config.threshold,
        noise_std = config.noise.std_dev,
        "running CDMA simulation"
    );

    let receptions = config.run().map_err(|e| {
        error!("simulation failed: {}", e);
        e
    })?;

    for (i, (reception, user)) in receptions.iter().zip(&config.users).enumerate() {
        println!("u{}: {}", i + 1, reception.text);
        if reception.text != user.text {
            info!(
                user = i + 1,
                code = %reception.code,
                dropped = reception.dropped(),
                "decoded text differs from what was sent"
            );
        }
    }

    if let Some(path) = &config.plot {
        let trace = &receptions[config.plot_user].trace;
        PngPlot::new(path).consume(trace)?;
    }

    Ok(())
}
