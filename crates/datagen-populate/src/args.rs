//! Common CLI argument definitions shared by all populators.

use clap::{Args, ValueEnum};
use datagen_engine::FailurePolicy;
use serde::Serialize;
use std::path::PathBuf;

/// Documents inserted when `--item-count` is not given.
pub const DEFAULT_ITEM_COUNT: i64 = 200_000;

/// Capacity assumed by backends that cannot report their own.
pub const DEFAULT_THROUGHPUT: i64 = 4000;

/// What to do with running workers once one has failed.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicyArg {
    /// Let every worker finish, then report the first failure
    #[default]
    WaitForAll,
    /// Stop all workers on the first failure and report partial counts
    CancelOnFailure,
}

impl From<FailurePolicyArg> for FailurePolicy {
    fn from(arg: FailurePolicyArg) -> Self {
        match arg {
            FailurePolicyArg::WaitForAll => FailurePolicy::WaitForAll,
            FailurePolicyArg::CancelOnFailure => FailurePolicy::CancelOnFailure,
        }
    }
}

/// Common arguments shared by all populators.
#[derive(Args, Clone, Debug, Serialize)]
pub struct CommonPopulateArgs {
    /// Number of documents to insert
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITEM_COUNT, allow_negative_numbers = true)]
    pub item_count: i64,

    /// Number of parallel workers (-1 = derive from container throughput)
    #[arg(long = "dp", visible_alias = "parallelism", default_value_t = -1, allow_negative_numbers = true)]
    pub parallelism: i64,

    /// Provisioned container throughput; read from the backend when omitted
    #[arg(short = 't', long, env = "DATAGEN_THROUGHPUT")]
    pub throughput: Option<i64>,

    /// Base random seed for reproducible runs (omit for OS entropy).
    /// A seeded run generates the same documents every time, so re-running it
    /// against the same collection collides on existing ids
    #[arg(long)]
    pub seed: Option<u64>,

    /// Behavior when a worker fails
    #[arg(long, value_enum, default_value_t = FailurePolicyArg::WaitForAll)]
    pub failure_policy: FailurePolicyArg,

    /// Dry-run mode: plan the run without inserting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write the final report as JSON to this path
    #[arg(long)]
    pub report_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        common: CommonPopulateArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["test"]);

        assert_eq!(cli.common.item_count, 200_000);
        assert_eq!(cli.common.parallelism, -1);
        assert_eq!(cli.common.seed, None);
        assert_eq!(cli.common.failure_policy, FailurePolicyArg::WaitForAll);
        assert!(!cli.common.dry_run);
    }

    #[test]
    fn test_explicit_values() {
        let cli = TestCli::parse_from([
            "test",
            "-n",
            "1000",
            "--dp",
            "8",
            "-t",
            "10000",
            "--seed",
            "42",
            "--failure-policy",
            "cancel-on-failure",
            "--dry-run",
        ]);

        assert_eq!(cli.common.item_count, 1000);
        assert_eq!(cli.common.parallelism, 8);
        assert_eq!(cli.common.throughput, Some(10_000));
        assert_eq!(cli.common.seed, Some(42));
        assert_eq!(
            FailurePolicy::from(cli.common.failure_policy),
            FailurePolicy::CancelOnFailure
        );
        assert!(cli.common.dry_run);
    }

    #[test]
    fn test_negative_parallelism_accepted_by_parser() {
        let cli = TestCli::parse_from(["test", "--parallelism", "-1"]);
        assert_eq!(cli.common.parallelism, -1);
    }
}
