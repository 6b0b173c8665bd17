use std::time::Duration;

use caneca_classifier_hf::{DEFAULT_ENDPOINT, HuggingFaceConfig};
use caneca_core::ServiceLimits;
use clap::Parser;

/// Photo-to-bin recommendation service for the Colombian colour code.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080, value_name = "PORT")]
    pub port: u16,

    /// Inference URL of the image-classification model
    #[arg(long, env = "CANECA_CLASSIFIER_URL", default_value = DEFAULT_ENDPOINT, value_name = "URL")]
    pub classifier_url: String,

    /// Bearer token for the inference endpoint
    #[arg(long, env = "HF_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub hf_token: Option<String>,

    /// Maximum concurrent model calls (defaults to the number of CPUs)
    #[arg(long, env = "CANECA_MAX_CONCURRENT", value_name = "COUNT")]
    pub max_concurrent: Option<usize>,

    /// Per-request classification budget in seconds, queueing included
    #[arg(long, env = "CANECA_TIMEOUT_SECS", default_value_t = 30, value_name = "SECONDS")]
    pub timeout_secs: u64,

    /// Largest accepted request body in bytes
    #[arg(long, env = "CANECA_MAX_UPLOAD_BYTES", default_value_t = 20 * 1024 * 1024, value_name = "BYTES")]
    pub max_upload_bytes: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub(crate) fn classifier_config(&self) -> HuggingFaceConfig {
        HuggingFaceConfig {
            endpoint: self.classifier_url.clone(),
            token: self.hf_token.clone(),
        }
    }

    pub(crate) fn limits(&self) -> ServiceLimits {
        let defaults = ServiceLimits::default();
        ServiceLimits {
            max_concurrent: self.max_concurrent.unwrap_or(defaults.max_concurrent),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_only_need_a_port() {
        let args = Args::try_parse_from(["caneca-server", "--port", "9090"]).expect("parse");

        assert_eq!(args.port, 9090);
        assert_eq!(args.classifier_config().endpoint, DEFAULT_ENDPOINT);
        assert_eq!(args.limits().timeout, Duration::from_secs(30));
        assert!(args.limits().max_concurrent >= 1);
        assert_eq!(args.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn explicit_limits_override_defaults() {
        let args = Args::try_parse_from([
            "caneca-server",
            "--port",
            "8080",
            "--max-concurrent",
            "3",
            "--timeout-secs",
            "5",
        ])
        .expect("parse");

        assert_eq!(args.limits().max_concurrent, 3);
        assert_eq!(args.limits().timeout, Duration::from_secs(5));
    }
}
