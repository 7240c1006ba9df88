use std::path::Path;

use common::catalog::{Catalog, IconPixels, MARKER_IMAGE, load_icon};
use iced::{
    Element, Theme, alignment,
    widget::{self, image, svg},
};
use lazy_static::lazy_static;
use tracing::{debug, warn};

const SVG_GOSSIP_STONE: &[u8] = include_bytes!("../assets/icons/gossip_stone.svg");

lazy_static! {
    static ref GOSSIP_STONE: svg::Handle = svg::Handle::from_memory(SVG_GOSSIP_STONE);
}

#[derive(Debug, Clone)]
pub enum Marker {
    Embedded(svg::Handle),
    Raster(image::Handle),
}

#[derive(Debug, Clone)]
pub enum Icon {
    Image(image::Handle),
    /// The image could not be read; drawn as a badge with the item's name.
    Missing(String),
}

/// Pre-decoded handles for the marker and every catalog item. A failing
/// image only affects its own entry.
#[derive(Debug, Clone)]
pub struct Icons {
    marker: Marker,
    items: Vec<Icon>,
    failures: Vec<String>,
}

impl Icons {
    pub fn load(catalog: &Catalog, root: &Path) -> Self {
        let marker = match load_icon(&root.join(MARKER_IMAGE)) {
            Ok(pixels) => Marker::Raster(handle(pixels)),
            Err(e) => {
                debug!("Using embedded marker: {:#}", e);
                Marker::Embedded(GOSSIP_STONE.clone())
            }
        };

        let mut failures = vec![];
        let items = catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let path = catalog
                    .resolve(root, index)
                    .unwrap_or_else(|| root.join(&entry.image));
                (entry, load_icon(&path))
            })
            .map(|(entry, loaded)| match loaded {
                Ok(pixels) => Icon::Image(handle(pixels)),
                Err(e) => {
                    warn!("Icon for {} unavailable: {:#}", entry.name, e);
                    failures.push(entry.name.clone());
                    Icon::Missing(entry.name.clone())
                }
            })
            .collect();

        Self {
            marker,
            items,
            failures,
        }
    }

    /// Names of catalog items whose image failed to load.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn marker<'a, M: 'a>(&'a self, size: f32) -> Element<'a, M> {
        match &self.marker {
            Marker::Embedded(handle) => svg(handle.clone()).width(size).height(size).into(),
            Marker::Raster(handle) => image(handle.clone()).width(size).height(size).into(),
        }
    }

    pub fn item<'a, M: 'a>(&'a self, index: usize, size: f32) -> Element<'a, M> {
        match self.items.get(index) {
            Some(Icon::Image(handle)) => image(handle.clone()).width(size).height(size).into(),
            Some(Icon::Missing(name)) => missing_badge(name, size),
            None => missing_badge("?", size),
        }
    }
}

fn handle(pixels: IconPixels) -> image::Handle {
    image::Handle::from_rgba(pixels.width, pixels.height, pixels.rgba)
}

fn missing_badge<'a, M: 'a>(name: &str, size: f32) -> Element<'a, M> {
    let initials: String = name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect();
    widget::container(widget::text(initials).size(size * 0.45))
        .width(size)
        .height(size)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .style(|theme: &Theme| {
            let palette = theme.extended_palette();
            widget::container::Style {
                text_color: Some(palette.danger.base.text),
                background: Some(palette.danger.base.color.into()),
                border: iced::Border::default().rounded(3.0),
                ..Default::default()
            }
        })
        .into()
}
