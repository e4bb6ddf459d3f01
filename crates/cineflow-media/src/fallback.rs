//! Built-in catalog data used when the catalog service is unreachable.

use cineflow_core::{AspectRatio, Size, Vec2};
use cineflow_timeline::{Asset, AssetKind, CanvasElement, ElementKind, ProjectTemplate};

use crate::catalog::{NodeTemplate, Workflow};

/// Sample library: four images, three videos, two audio tracks.
pub fn assets() -> Vec<Asset> {
    vec![
        image("img-mountains", "Mountain Range", "/media/images/mountains.jpg"),
        image("img-city-night", "City at Night", "/media/images/city-night.jpg"),
        image("img-beach", "Beach Sunset", "/media/images/beach-sunset.jpg"),
        image("img-forest", "Forest Path", "/media/images/forest-path.jpg"),
        media("vid-waves", "Ocean Waves", AssetKind::Video, "/media/video/ocean-waves.mp4", 12.0),
        media(
            "vid-traffic",
            "Traffic Timelapse",
            AssetKind::Video,
            "/media/video/traffic.mp4",
            20.0,
        ),
        media("vid-clouds", "Drifting Clouds", AssetKind::Video, "/media/video/clouds.mp4", 8.0),
        media("aud-ambient", "Ambient Pad", AssetKind::Audio, "/media/audio/ambient-pad.mp3", 45.0),
        media("aud-upbeat", "Upbeat Loop", AssetKind::Audio, "/media/audio/upbeat-loop.mp3", 30.0),
    ]
}

fn image(id: &str, name: &str, url: &str) -> Asset {
    let mut asset = Asset::new(id, name, AssetKind::Image, url);
    asset.thumbnail = Some(url.to_owned());
    asset
}

fn media(id: &str, name: &str, kind: AssetKind, url: &str, seconds: f64) -> Asset {
    Asset::new(id, name, kind, url).with_duration(seconds)
}

/// Starter projects: widescreen, vertical and square.
pub fn templates() -> Vec<ProjectTemplate> {
    vec![
        template("tpl-youtube", "YouTube Video", AspectRatio::WIDESCREEN, 60.0, "Your Title Here"),
        template("tpl-story", "Vertical Story", AspectRatio::VERTICAL, 30.0, "Swipe Up"),
        template("tpl-square", "Square Post", AspectRatio::SQUARE, 15.0, "New Post"),
    ]
}

fn template(
    id: &str,
    name: &str,
    aspect_ratio: AspectRatio,
    total_duration: f64,
    title: &str,
) -> ProjectTemplate {
    let title = CanvasElement::new(
        ElementKind::text(title),
        Vec2::new(100.0, 100.0),
        Size::new(600.0, 120.0),
        0.0,
        total_duration.min(5.0),
    );
    ProjectTemplate {
        id: id.into(),
        name: name.into(),
        aspect_ratio,
        total_duration,
        elements: vec![title],
    }
}

pub fn node_templates() -> Vec<NodeTemplate> {
    vec![
        node(
            "node-input",
            "Media Input",
            "source",
            "Load an asset from the library",
            &[],
            &["media"],
        ),
        node("node-trim", "Trim", "edit", "Cut media to a time range", &["media"], &["media"]),
        node(
            "node-caption",
            "Auto Caption",
            "ai",
            "Generate captions from speech",
            &["media"],
            &["media", "captions"],
        ),
        node(
            "node-reframe",
            "Smart Reframe",
            "ai",
            "Crop to a new aspect ratio",
            &["media"],
            &["media"],
        ),
        node("node-output", "Render Output", "sink", "Write the result to a file", &["media"], &[]),
    ]
}

fn node(
    id: &str,
    name: &str,
    category: &str,
    description: &str,
    inputs: &[&str],
    outputs: &[&str],
) -> NodeTemplate {
    NodeTemplate {
        id: id.into(),
        name: name.into(),
        category: category.into(),
        description: description.into(),
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
        outputs: outputs.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn workflows() -> Vec<Workflow> {
    vec![
        Workflow {
            id: "wf-social-clip".into(),
            name: "Social Clip".into(),
            description: "Trim, reframe to vertical and caption".into(),
            nodes: ["node-input", "node-trim", "node-reframe", "node-caption", "node-output"]
                .map(String::from)
                .to_vec(),
        },
        Workflow {
            id: "wf-captions".into(),
            name: "Captions Only".into(),
            description: "Caption a clip without other changes".into(),
            nodes: ["node-input", "node-caption", "node-output"].map(String::from).to_vec(),
        },
    ]
}
