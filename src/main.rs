use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use timed_quiz::{Quiz, QuizConfig, Timing, logging};
use tracing::error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from
    #[arg(short, long)]
    questions: PathBuf,

    /// Seconds allowed for the whole quiz
    #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    time_limit: u32,

    /// Pause after each answer before the next question, in milliseconds (500-2000)
    #[arg(
        long,
        default_value_t = 500,
        value_parser = clap::value_parser!(u64).range(500..=2000)
    )]
    feedback_delay_ms: u64,

    /// File holding the high score (defaults to the user data directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Directory for the log file (defaults to the user cache directory)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn into_config(self) -> QuizConfig {
        let timing = Timing {
            time_limit_secs: self.time_limit,
            feedback_delay: Duration::from_millis(self.feedback_delay_ms),
            ..Timing::default()
        };
        let config = QuizConfig::new(self.questions).with_timing(timing);
        match self.store {
            Some(path) => config.with_store_path(path),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_dir = args.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    let _log_guard = match logging::init(&log_dir, args.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    let quiz = match Quiz::from_config(args.into_config()) {
        Ok(quiz) => quiz,
        Err(e) => {
            error!(error = %e, "startup failed");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = quiz.run().await {
        error!(error = %e, "quiz aborted");
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["timed-quiz", "--questions", "q.json"]);
        let config = args.into_config();
        assert_eq!(config.timing, Timing::default());
        assert_eq!(config.questions_path, PathBuf::from("q.json"));
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "timed-quiz",
            "-q",
            "q.json",
            "--time-limit",
            "30",
            "--feedback-delay-ms",
            "2000",
            "--store",
            "/tmp/hs.json",
            "-vv",
        ]);
        assert_eq!(args.verbose, 2);
        let config = args.into_config();
        assert_eq!(config.timing.time_limit_secs, 30);
        assert_eq!(config.timing.feedback_delay, Duration::from_millis(2000));
        assert_eq!(config.store_path, PathBuf::from("/tmp/hs.json"));
    }

    #[test]
    fn test_zero_time_limit_is_rejected() {
        assert!(Args::try_parse_from(["timed-quiz", "-q", "q.json", "-t", "0"]).is_err());
    }

    #[test]
    fn test_feedback_delay_outside_range_is_rejected() {
        for delay in ["0", "499", "2001"] {
            let parsed =
                Args::try_parse_from(["timed-quiz", "-q", "q.json", "--feedback-delay-ms", delay]);
            assert!(parsed.is_err(), "{delay} ms should be rejected");
        }
    }
}
