use crate::annotate::LabeledBox;
use crate::matching::IdentityMap;
use crate::track::ViewDetections;
use anyhow::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

fn save<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Unable to create directory {}", dir.display()))?;
        }
    }
    let file =
        File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|| format!("Unable to serialize into {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Malformed content of {}", path.display()))
}

/// Saves the per-frame records of a video
///
pub fn save_detections(detections: &ViewDetections, path: &Path) -> Result<()> {
    save(detections, path)?;
    info!(
        "Detections of {} frames saved to {}",
        detections.len(),
        path.display()
    );
    Ok(())
}

pub fn load_detections(path: &Path) -> Result<ViewDetections> {
    load(path)
}

/// Saves the identity map of the secondary camera tracks
///
pub fn save_identities(identities: &IdentityMap, path: &Path) -> Result<()> {
    save(identities, path)?;
    info!(
        "Identities of {} tracks saved to {}",
        identities.len(),
        path.display()
    );
    Ok(())
}

pub fn load_identities(path: &Path) -> Result<IdentityMap> {
    load(path)
}

/// Saves the labeled boxes of every frame
///
pub fn save_labels(labels: &[Vec<LabeledBox>], path: &Path) -> Result<()> {
    save(labels, path)?;
    info!("Labels of {} frames saved to {}", labels.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::matching::{Identity, IdentityMap};
    use crate::persist::{load_detections, load_identities, save_detections, save_identities};
    use crate::track::{Detection, ViewDetections};
    use crate::utils::bbox::BoundingBox;
    use std::path::PathBuf;

    fn tmp(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("camreid-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn detections_file() {
        let path = tmp("detections.json");
        let detections: ViewDetections = vec![
            vec![Detection::new(
                3,
                BoundingBox::new(1.0, 2.0, 31.0, 62.0),
                vec![0.5, 0.25],
            )],
            vec![],
        ];
        save_detections(&detections, &path).unwrap();
        assert_eq!(load_detections(&path).unwrap(), detections);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            r#"[[{"track_id":3,"bbox":[1.0,2.0,31.0,62.0],"embedding":[0.5,0.25]}],[]]"#
        );
    }

    #[test]
    fn identities_file() {
        let path = tmp("identities.json");
        let map = IdentityMap::from([(4, Identity::Matched(1)), (5, Identity::Unmatched(5))]);
        save_identities(&map, &path).unwrap();
        assert_eq!(load_identities(&path).unwrap(), map);
    }

    #[test]
    fn missing_file() {
        let err = load_identities(&tmp("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Unable to open"));
    }
}
