use anyhow::{Context, Result};

use umbra_engine::device::GpuInit;
use umbra_engine::logging::{init_logging, LoggingConfig};
use umbra_engine::scene::SceneConfig;
use umbra_engine::window::{Runtime, RuntimeConfig};

mod app;

use app::ShadowScene;

const INSTANCES_VAR: &str = "UMBRA_INSTANCES";
const SEED_VAR: &str = "UMBRA_SEED";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let scene_config = scene_config(
        std::env::var(INSTANCES_VAR).ok().as_deref(),
        std::env::var(SEED_VAR).ok().as_deref(),
    )?;

    let app = ShadowScene::new(&scene_config)?;

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), app)
}

/// Applies the optional environment overrides on top of the default scene.
fn scene_config(instances: Option<&str>, seed: Option<&str>) -> Result<SceneConfig> {
    let mut config = SceneConfig::default();

    if let Some(raw) = instances {
        config.instance_count = raw
            .trim()
            .parse()
            .with_context(|| format!("{INSTANCES_VAR} must be an unsigned integer, got {raw:?}"))?;
    }

    if let Some(raw) = seed {
        let seed = raw
            .trim()
            .parse()
            .with_context(|| format!("{SEED_VAR} must be an unsigned integer, got {raw:?}"))?;
        config.seed = Some(seed);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        let cfg = scene_config(None, None).unwrap();
        assert_eq!(cfg, SceneConfig::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = scene_config(Some(" 64 "), Some("42")).unwrap();
        assert_eq!(cfg.instance_count, 64);
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn malformed_override_is_an_error() {
        assert!(scene_config(Some("many"), None).is_err());
        assert!(scene_config(None, Some("-1")).is_err());
    }
}
