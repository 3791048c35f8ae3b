use anyhow::Result;
use camreid::annotate::{Annotator, ViewRole};
use camreid::matching::options::{MatcherOptions, DEFAULT_MATCH_THRESHOLD};
use camreid::matching::{CrossViewMatcher, MatchReason};
use camreid::persist::{load_detections, load_identities, save_identities, save_labels};
use camreid::summary::{TrackSummarizer, DEFAULT_MIN_OBSERVATIONS};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cross-camera player re-identification", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match the tracks of the secondary camera to the tracks of the primary camera
    Match {
        /// Per-frame records of the primary camera
        #[arg(short, long)]
        primary: PathBuf,

        /// Per-frame records of the secondary camera
        #[arg(short, long)]
        secondary: PathBuf,

        /// Where to save the identity map
        #[arg(short, long, default_value = "outputs/player_id_mapping.json")]
        output: PathBuf,

        /// Maximal cosine distance of the accepted match
        #[arg(short, long, default_value_t = DEFAULT_MATCH_THRESHOLD)]
        threshold: f32,

        /// Minimal number of observations for the track to participate
        #[arg(long, default_value_t = DEFAULT_MIN_OBSERVATIONS)]
        min_obs: usize,
    },
    /// Resolve the labels to draw for every frame of one camera
    Annotate {
        /// Per-frame records of the camera
        #[arg(short, long)]
        detections: PathBuf,

        /// Identity map produced by `match`
        #[arg(short, long)]
        mapping: PathBuf,

        /// Camera role: primary or secondary
        #[arg(short, long)]
        role: ViewRole,

        /// Where to save the labeled boxes
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Match {
            primary,
            secondary,
            output,
            threshold,
            min_obs,
        } => {
            let summarizer = TrackSummarizer::new(min_obs)?;
            let matcher = CrossViewMatcher::new(MatcherOptions::default().threshold(threshold))?;
            let primary = load_detections(&primary)?;
            let secondary = load_detections(&secondary)?;

            let outcome = matcher.match_videos(&summarizer, &primary, &secondary)?;
            for d in outcome.decisions() {
                match d.reason {
                    MatchReason::Accepted { distance } => {
                        debug!("{} -> {} ({:.3})", d.secondary, d.identity, distance)
                    }
                    MatchReason::Rejected { primary, distance } => debug!(
                        "{} -> {} (closest {} at {:.3})",
                        d.secondary, d.identity, primary, distance
                    ),
                    MatchReason::Surplus | MatchReason::NoRepresentative => {
                        debug!("{} -> {} ({:?})", d.secondary, d.identity, d.reason)
                    }
                }
            }
            info!(
                "Matched: {} / {}",
                outcome.matched(),
                outcome.identities().len()
            );
            save_identities(outcome.identities(), &output)?;
        }
        Command::Annotate {
            detections,
            mapping,
            role,
            output,
        } => {
            let detections = load_detections(&detections)?;
            let identities = load_identities(&mapping)?;
            let labels = Annotator::new(&identities, role).annotate(&detections);
            save_labels(&labels, &output)?;
        }
    }
    Ok(())
}
