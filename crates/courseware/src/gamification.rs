/// Gamification configuration authored alongside courses
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub criteria: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub name: String,
    pub points_required: u32,
    #[serde(default)]
    pub reward_description: String,
}

/// Points awarded per completed activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRule {
    pub lesson_points: u32,
    pub quiz_points: u32,
    pub simulation_points: u32,
}

/// Badges, milestones and point rules loaded from disk
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationConfig {
    pub badges: HashMap<String, Badge>,
    pub milestones: HashMap<String, Milestone>,
    pub point_rule: PointRule,
}

impl GamificationConfig {
    /// Loads configuration from a directory laid out as
    /// `badges/*.json`, `milestones/*.json` and `point_rules.json`.
    ///
    /// Missing subdirectories or a missing `point_rules.json` leave the
    /// corresponding part empty.
    ///
    /// # Arguments
    /// * `config_dir` - Path to the gamification directory
    ///
    /// # Returns
    /// * `Ok(GamificationConfig)` - Loaded configuration
    /// * `Err(ConfigError)` - If a file can't be read or parsed, or an id repeats
    pub fn load_from_directory(config_dir: &Path) -> Result<Self, ConfigError> {
        let badges: Vec<Badge> = load_json_files(&config_dir.join("badges"))?;
        let milestones: Vec<Milestone> = load_json_files(&config_dir.join("milestones"))?;

        let rules_path = config_dir.join("point_rules.json");
        let point_rule = if rules_path.is_file() {
            let content = fs::read_to_string(&rules_path)?;
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: rules_path.display().to_string(),
                source: e,
            })?
        } else {
            PointRule::default()
        };

        let config = Self::from_parts(badges, milestones, point_rule)?;
        info!(
            dir = %config_dir.display(),
            badges = config.badges.len(),
            milestones = config.milestones.len(),
            "Loaded gamification config"
        );
        Ok(config)
    }

    /// Builds a configuration, rejecting repeated badge or milestone ids.
    pub fn from_parts(badges: Vec<Badge>, milestones: Vec<Milestone>, point_rule: PointRule) -> Result<Self, ConfigError> {
        let mut badge_map = HashMap::new();
        for badge in badges {
            if badge_map.contains_key(&badge.id) {
                return Err(ConfigError::DuplicateId {
                    kind: "badge",
                    id: badge.id,
                });
            }
            badge_map.insert(badge.id.clone(), badge);
        }

        let mut milestone_map = HashMap::new();
        for milestone in milestones {
            if milestone_map.contains_key(&milestone.id) {
                return Err(ConfigError::DuplicateId {
                    kind: "milestone",
                    id: milestone.id,
                });
            }
            milestone_map.insert(milestone.id.clone(), milestone);
        }

        Ok(Self {
            badges: badge_map,
            milestones: milestone_map,
            point_rule,
        })
    }

    /// Creates an empty configuration
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a badge by id.
    pub fn get_badge(&self, id: &str) -> Option<&Badge> {
        self.badges.get(id)
    }

    /// Looks up a milestone by id.
    pub fn get_milestone(&self, id: &str) -> Option<&Milestone> {
        self.milestones.get(id)
    }

    /// Badges ordered by id.
    pub fn badges_by_id(&self) -> Vec<&Badge> {
        let mut list: Vec<&Badge> = self.badges.values().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    /// Milestones ordered by points required, then id.
    pub fn milestones_by_points(&self) -> Vec<&Milestone> {
        let mut list: Vec<&Milestone> = self.milestones.values().collect();
        list.sort_by(|a, b| a.points_required.cmp(&b.points_required).then_with(|| a.id.cmp(&b.id)));
        list
    }
}

/// Reads every `*.json` file in `dir`, each holding one item or an array.
fn load_json_files<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    let mut items = Vec::new();
    if !dir.is_dir() {
        return Ok(items);
    }

    let mut paths: Vec<_> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    paths.sort();

    for path in paths {
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let content = fs::read_to_string(&path)?;
        let parsed: OneOrMany<T> = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        match parsed {
            OneOrMany::Many(list) => items.extend(list),
            OneOrMany::One(item) => items.push(item),
        }
    }

    Ok(items)
}
