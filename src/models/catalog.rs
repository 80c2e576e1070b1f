//! Catalog entities: crops, their diseases, treatments, and care tips.
//!
//! The catalog is reference data maintained out-of-band (seed command or
//! operator tooling). The inference pipeline only reads it, and references
//! it from prediction history by nullable id.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A crop the classifier knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crop {
    pub id: i64,
    /// Display name; unique, and the join key the pipeline matches
    /// predicted crop strings against (case-insensitively).
    pub name: String,
    pub scientific_name: String,
    pub description: String,
    /// Relative path of an illustration inside the uploads dir, if any.
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Crop {
    pub fn new(name: String, scientific_name: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Set by database
            name,
            scientific_name,
            description,
            image_path: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A disease affecting one crop. Identity is (crop, name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disease {
    pub id: i64,
    pub crop_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Disease {
    pub fn new(crop_id: i64, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            crop_id,
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A database-backed treatment for a disease.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: i64,
    pub disease_id: i64,
    pub title: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Treatment {
    pub fn new(disease_id: i64, title: String, instructions: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            disease_id,
            title,
            instructions,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Category of a crop-care tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Watering,
    Fertilizing,
    Pruning,
    PestControl,
    SoilManagement,
    General,
}

impl TipCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watering => "watering",
            Self::Fertilizing => "fertilizing",
            Self::Pruning => "pruning",
            Self::PestControl => "pest_control",
            Self::SoilManagement => "soil_management",
            Self::General => "general",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "watering" => Some(Self::Watering),
            "fertilizing" => Some(Self::Fertilizing),
            "pruning" => Some(Self::Pruning),
            "pest_control" => Some(Self::PestControl),
            "soil_management" => Some(Self::SoilManagement),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

/// Season a tip applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    All,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
            Self::All => "all",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "autumn" => Some(Self::Autumn),
            "winter" => Some(Self::Winter),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// A general care tip for a crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropTip {
    pub id: i64,
    pub crop_id: i64,
    pub title: String,
    pub content: String,
    pub tip_type: TipCategory,
    pub season: Season,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CropTip {
    pub fn new(crop_id: i64, title: String, content: String, tip_type: TipCategory) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            crop_id,
            title,
            content,
            tip_type,
            season: Season::All,
            created_at: now,
            updated_at: now,
        }
    }
}
