//! Built-in pixel art
//!
//! Sprites are laid out on a 16×16 grid per visual family and scaled to the
//! configured size. The material palette tints the body, Perlin noise adds
//! grain, and higher complexity adds outlines, gems and highlights.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{ImageEncoder, Rgba, RgbaImage};
use noise::{NoiseFn, Perlin};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::{Map, Value};

use super::{ArtError, ArtGenerator, ArtOutput, ArtRequest, VisualFamily};

/// Layout grid every sprite is designed on
const GRID: u32 = 16;

const OUTLINE: [u8; 3] = [24, 20, 28];
const HANDLE: [u8; 3] = [95, 62, 38];
const PAPER: [u8; 3] = [238, 228, 205];

const GEMS: [(&str, [u8; 3]); 6] = [
    ("ruby", [210, 30, 50]),
    ("sapphire", [40, 70, 200]),
    ("emerald", [30, 170, 80]),
    ("amethyst", [150, 70, 200]),
    ("topaz", [240, 170, 40]),
    ("diamond", [235, 245, 255]),
];

const LIQUIDS: [(&str, [u8; 3]); 7] = [
    ("crimson", [190, 30, 45]),
    ("azure", [40, 90, 210]),
    ("gold", [230, 180, 40]),
    ("green", [60, 170, 70]),
    ("amber", [220, 140, 30]),
    ("violet", [140, 60, 190]),
    ("teal", [40, 160, 160]),
];

/// Base colour for a material palette key
fn palette_rgb(key: &str) -> [u8; 3] {
    match key {
        "steel" => [170, 178, 190],
        "iron" => [120, 120, 128],
        "bronze" => [176, 120, 60],
        "mithril" => [200, 220, 240],
        "adamantine" => [70, 90, 110],
        "obsidian" => [40, 30, 50],
        "silver" => [200, 200, 210],
        "gold" => [230, 190, 60],
        "copper" => [190, 110, 70],
        "jade" => [80, 170, 120],
        "bone" => [225, 215, 190],
        "dragonscale" => [150, 40, 40],
        "wood" => [140, 100, 60],
        "oak" => [120, 85, 50],
        "ash" => [190, 170, 140],
        "yew" => [150, 90, 60],
        "ironwood" => [90, 70, 60],
        "leather" => [130, 85, 50],
        "hardened_leather" => [105, 70, 40],
        "linen" => [220, 210, 185],
        "wool" => [170, 160, 140],
        "silk" => [200, 160, 210],
        "spidersilk" => [235, 235, 240],
        "shadowweave" => [50, 40, 70],
        "vellum" => [225, 205, 165],
        "dragonhide" => [120, 50, 40],
        "glass" => [190, 225, 235],
        "crystal" => [210, 235, 255],
        "clay" => [170, 110, 80],
        other => {
            log::debug!("No palette for '{}', using grey", other);
            [160, 160, 160]
        }
    }
}

/// What a grid cell is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Body,
    Accent,
    Handle,
    Gem,
    Liquid,
    Paper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RobeStyle {
    Straight,
    Flared,
    Wrap,
}

impl RobeStyle {
    const ALL: [RobeStyle; 3] = [RobeStyle::Straight, RobeStyle::Flared, RobeStyle::Wrap];

    fn name(&self) -> &'static str {
        match self {
            RobeStyle::Straight => "straight",
            RobeStyle::Flared => "flared",
            RobeStyle::Wrap => "wrap",
        }
    }
}

/// Per-sprite choices made before drawing
#[derive(Debug, Clone, Copy)]
struct Layout<'a> {
    key: &'a str,
    has_gem: bool,
    robe: RobeStyle,
}

impl Layout<'_> {
    fn gem(&self) -> Part {
        if self.has_gem {
            Part::Gem
        } else {
            Part::Accent
        }
    }
}

fn rect(x: i32, y: i32, x0: i32, x1: i32, y0: i32, y1: i32) -> bool {
    (x0..=x1).contains(&x) && (y0..=y1).contains(&y)
}

/// Distance from a cell centre to a point on the grid
fn dist(x: i32, y: i32, cx: f64, cy: f64) -> f64 {
    let dx = x as f64 + 0.5 - cx;
    let dy = y as f64 + 0.5 - cy;
    (dx * dx + dy * dy).sqrt()
}

fn sword(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    let top = match l.key {
        "shortsword" => 4,
        "greatsword" => 0,
        _ => 1,
    };
    let (b0, b1) = if l.key == "greatsword" { (6, 9) } else { (7, 8) };
    let (g0, g1) = match l.key {
        "greatsword" => (3, 12),
        "rapier" => (5, 10),
        _ => (4, 11),
    };
    let shift = i32::from(l.key == "scimitar" && y <= 4);

    if y == top && rect(x, y, 7 + shift, 8 + shift, top, top) {
        return Some(Part::Body);
    }
    if y > top && y <= 10 && (b0 + shift..=b1 + shift).contains(&x) {
        return Some(Part::Body);
    }
    if y == 11 && (g0..=g1).contains(&x) {
        return Some(Part::Accent);
    }
    if l.key == "rapier" && x == 10 && (12..=14).contains(&y) {
        return Some(Part::Accent);
    }
    if rect(x, y, 7, 8, 12, 14) {
        return Some(Part::Handle);
    }
    if rect(x, y, 7, 8, 15, 15) {
        return Some(l.gem());
    }
    None
}

fn axe(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    let (h0, h1) = if l.key == "greataxe" { (1, 8) } else { (2, 7) };
    let double = matches!(l.key, "battleaxe" | "greataxe");

    if rect(x, y, 9, 12, h0 + 1, h1 - 1) || (double && rect(x, y, 3, 6, h0 + 1, h1 - 1)) {
        return Some(Part::Body);
    }
    if rect(x, y, 13, 13, h0, h1) || (double && rect(x, y, 2, 2, h0, h1)) {
        return Some(Part::Accent);
    }
    if rect(x, y, 7, 8, 1, 15) {
        return Some(Part::Handle);
    }
    None
}

fn blunt(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    match l.key {
        "club" => {
            let half = if y < 8 { 2 } else { 1 };
            (rect(x, y, 8 - half, 7 + half, 1, 15)).then_some(if y >= 12 { Part::Handle } else { Part::Body })
        }
        "warhammer" | "maul" => {
            let (x0, x1, y0, y1) = if l.key == "maul" { (2, 13, 1, 6) } else { (3, 12, 2, 5) };
            if rect(x, y, x0, x1, y0, y1) {
                Some(if x == x0 || x == x1 { Part::Accent } else { Part::Body })
            } else if rect(x, y, 7, 8, y1 + 1, 15) {
                Some(Part::Handle)
            } else {
                None
            }
        }
        _ => {
            if rect(x, y, 7, 8, 0, 0) || rect(x, y, 3, 3, 3, 4) || rect(x, y, 12, 12, 3, 4) {
                Some(Part::Accent)
            } else if dist(x, y, 8.0, 4.0) <= 3.2 {
                Some(Part::Body)
            } else if rect(x, y, 7, 8, 7, 15) {
                Some(Part::Handle)
            } else {
                None
            }
        }
    }
}

fn bow(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    if !(1..=14).contains(&y) {
        return None;
    }
    let amplitude = if l.key == "shortbow" { 6.0 } else { 7.0 };
    let t = f64::from(y - 1) / 13.0;
    let arc = 4 + (amplitude * (std::f64::consts::PI * t).sin()).round() as i32;

    let curl = l.key == "recurve_bow" && (y == 1 || y == 14) && x == arc + 1;
    if x == arc || curl {
        return Some(if (7..=8).contains(&y) { Part::Handle } else { Part::Body });
    }
    if x == 4 {
        return Some(Part::Accent);
    }
    None
}

fn staff(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    match l.key {
        "arcane_staff" => {
            if dist(x, y, 8.0, 3.0) <= 2.0 {
                Some(l.gem())
            } else if rect(x, y, 5, 5, 2, 5) || rect(x, y, 10, 10, 2, 5) {
                Some(Part::Accent)
            } else if rect(x, y, 7, 8, 5, 15) {
                Some(Part::Body)
            } else {
                None
            }
        }
        "battle_staff" => {
            if rect(x, y, 7, 8, 1, 2) || rect(x, y, 7, 8, 14, 15) {
                Some(Part::Accent)
            } else if rect(x, y, 7, 8, 3, 13) {
                Some(Part::Body)
            } else {
                None
            }
        }
        _ => {
            if rect(x, y, 7, 8, 1, 1) || rect(x, y, 7, 8, 15, 15) {
                Some(Part::Accent)
            } else if rect(x, y, 7, 8, 2, 14) {
                Some(Part::Body)
            } else {
                None
            }
        }
    }
}

fn armor(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    let sleeves = l.key != "breastplate";
    let plated = matches!(l.key, "breastplate" | "plate_armor");

    if rect(x, y, 6, 9, 3, 4) {
        return None;
    }
    if rect(x, y, 3, 12, 3, 14) {
        if rect(x, y, 7, 8, 7, 7) && l.has_gem {
            return Some(Part::Gem);
        }
        if y == 11 {
            return Some(Part::Accent);
        }
        if l.key == "chain_mail" && (x + y) % 3 == 0 {
            return Some(Part::Accent);
        }
        return Some(Part::Body);
    }
    if sleeves && (rect(x, y, 1, 2, 3, 8) || rect(x, y, 13, 14, 3, 8)) {
        return Some(if plated { Part::Accent } else { Part::Body });
    }
    None
}

fn robe(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    if dist(x, y, 8.0, 3.0) <= 2.5 {
        return Some(Part::Accent);
    }
    if !(5..=15).contains(&y) {
        return None;
    }

    let dx = (x as f64 + 0.5 - 8.0).abs();
    let half = match l.robe {
        RobeStyle::Straight => 4.0,
        RobeStyle::Flared | RobeStyle::Wrap => 3.0 + f64::from(y - 5) * 0.45,
    };

    if dx <= half {
        if y == 9 {
            return Some(Part::Accent);
        }
        if l.robe == RobeStyle::Wrap && x - 4 == y - 5 {
            return Some(Part::Accent);
        }
        if l.key == "vestments" && (7..=8).contains(&x) {
            return Some(Part::Accent);
        }
        if l.key == "mantle" && y <= 7 {
            return Some(Part::Accent);
        }
        return Some(Part::Body);
    }
    if y <= 9 && dx <= 6.5 {
        return Some(Part::Body);
    }
    None
}

fn shield(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    match l.key {
        "buckler" => {
            let d = dist(x, y, 8.0, 8.0);
            if d <= 1.5 {
                Some(l.gem())
            } else if d <= 5.5 {
                Some(Part::Body)
            } else if d <= 6.5 {
                Some(Part::Accent)
            } else {
                None
            }
        }
        "tower_shield" => {
            if !rect(x, y, 2, 13, 1, 15) {
                None
            } else if x == 2 || x == 13 || y == 1 || y == 15 {
                Some(Part::Accent)
            } else if dist(x, y, 8.0, 7.0) <= 1.2 {
                Some(l.gem())
            } else {
                Some(Part::Body)
            }
        }
        _ => {
            if !(1..=15).contains(&y) {
                return None;
            }
            let half = if y <= 8 { 6.0 } else { 6.0 - f64::from(y - 8) * 0.85 };
            let dx = (x as f64 + 0.5 - 8.0).abs();
            if dx > half {
                None
            } else if half - dx < 1.0 || y == 1 {
                Some(Part::Accent)
            } else if dist(x, y, 8.0, 6.0) <= 1.2 {
                Some(l.gem())
            } else if (7..=8).contains(&x) {
                Some(Part::Accent)
            } else {
                Some(Part::Body)
            }
        }
    }
}

fn headwear(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    match l.key {
        "cap" => {
            if rect(x, y, 2, 13, 9, 10) {
                Some(Part::Accent)
            } else if y < 9 && dist(x, y, 8.0, 9.0) <= 5.5 {
                Some(Part::Body)
            } else {
                None
            }
        }
        "hood" => {
            if y > 14 || dist(x, y, 8.0, 9.5) <= 3.0 {
                None
            } else if dist(x, y, 8.0, 8.0) <= 6.5 {
                Some(Part::Body)
            } else {
                None
            }
        }
        "greathelm" => {
            let corner = (x == 3 || x == 12) && y == 2;
            if !rect(x, y, 3, 12, 2, 14) || corner || rect(x, y, 4, 11, 6, 6) {
                None
            } else if rect(x, y, 7, 8, 3, 3) && l.has_gem {
                Some(Part::Gem)
            } else if y == 10 && x % 2 == 0 {
                Some(Part::Accent)
            } else {
                Some(Part::Body)
            }
        }
        _ => {
            if rect(x, y, 5, 10, 8, 8) && !(7..=8).contains(&x) {
                None
            } else if rect(x, y, 7, 8, 8, 11) {
                Some(Part::Accent)
            } else if dist(x, y, 8.0, 4.5) <= 1.2 && l.has_gem {
                Some(Part::Gem)
            } else if y <= 12 && dist(x, y, 8.0, 8.0) <= 5.5 {
                Some(Part::Body)
            } else {
                None
            }
        }
    }
}

fn gloves(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    if l.key == "bracers" {
        return if !rect(x, y, 4, 11, 2, 13) {
            None
        } else if y == 4 || y == 11 {
            Some(Part::Accent)
        } else {
            Some(Part::Body)
        };
    }

    let gauntlets = l.key == "gauntlets";
    let (c0, c1) = if gauntlets { (2, 13) } else { (3, 12) };
    if rect(x, y, c0, c1, 12, 14) {
        return Some(Part::Accent);
    }
    if rect(x, y, 4, 11, 6, 11) {
        return Some(if gauntlets && y == 6 { Part::Accent } else { Part::Body });
    }
    let finger_top = match x {
        4 | 5 | 10 | 11 => 3,
        7 | 8 => 2,
        _ => i32::MAX,
    };
    if (finger_top..=5).contains(&y) {
        return Some(Part::Body);
    }
    if rect(x, y, 12, 13, 7, 10) {
        return Some(Part::Body);
    }
    None
}

fn footwear(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    if l.key == "sandals" {
        return if rect(x, y, 3, 12, 13, 14) {
            Some(Part::Accent)
        } else if rect(x, y, 4, 8, 9, 12) && y % 2 == 0 {
            Some(Part::Body)
        } else {
            None
        };
    }

    let plated = l.key == "sabatons";
    if rect(x, y, 4, 12, 14, 14) || rect(x, y, 4, 8, 2, 2) {
        return Some(Part::Accent);
    }
    if rect(x, y, 4, 8, 3, 13) || rect(x, y, 4, 12, 10, 13) {
        return Some(if plated && y % 3 == 0 { Part::Accent } else { Part::Body });
    }
    None
}

fn jewelry(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    match l.key {
        "pendant" => {
            let chain = y <= 7 && (x == 4 + y / 2 || x == 11 - y / 2);
            let d = dist(x, y, 8.0, 11.0);
            if d <= 1.5 {
                Some(l.gem())
            } else if d <= 3.5 {
                Some(Part::Body)
            } else if chain {
                Some(Part::Accent)
            } else {
                None
            }
        }
        "torc" => {
            let d = dist(x, y, 8.0, 8.0);
            let gap = y >= 12 && (x as f64 + 0.5 - 8.0).abs() < 2.5;
            if gap || !(4.5..=6.0).contains(&d) {
                None
            } else if y >= 11 {
                Some(Part::Accent)
            } else {
                Some(Part::Body)
            }
        }
        "signet" => {
            if rect(x, y, 5, 10, 2, 5) {
                Some(if rect(x, y, 7, 8, 3, 4) { l.gem() } else { Part::Accent })
            } else if (3.5..=5.0).contains(&dist(x, y, 8.0, 9.0)) {
                Some(Part::Body)
            } else {
                None
            }
        }
        _ => {
            if dist(x, y, 8.0, 3.5) <= 1.5 && l.has_gem {
                Some(Part::Gem)
            } else if (3.5..=5.0).contains(&dist(x, y, 8.0, 9.0)) {
                Some(Part::Body)
            } else {
                None
            }
        }
    }
}

fn book(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    if !rect(x, y, 3, 12, 2, 14) {
        return None;
    }
    if x == 12 && (3..=13).contains(&y) {
        return Some(Part::Paper);
    }
    if x <= 4 {
        return Some(Part::Accent);
    }
    match l.key {
        "grimoire" => {
            if rect(x, y, 11, 11, 7, 9) {
                Some(Part::Accent)
            } else if dist(x, y, 8.0, 8.5) <= 1.5 {
                Some(l.gem())
            } else {
                Some(Part::Body)
            }
        }
        "prayer_book" => {
            if rect(x, y, 7, 8, 5, 11) || rect(x, y, 5, 10, 7, 8) {
                Some(Part::Accent)
            } else {
                Some(Part::Body)
            }
        }
        _ => {
            if (x == 5 || x == 11) && (y == 2 || y == 14) {
                Some(Part::Accent)
            } else if rect(x, y, 7, 8, 8, 8) && l.has_gem {
                Some(Part::Gem)
            } else {
                Some(Part::Body)
            }
        }
    }
}

fn potion(l: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    let (in_body, neck, liquid_line) = match l.key {
        "tall_vial" => (rect(x, y, 6, 9, 4, 14), rect(x, y, 7, 8, 2, 3), 7),
        "ornate_bottle" => {
            let dx = (x as f64 + 0.5 - 8.0).abs();
            let dy = (y as f64 + 0.5 - 9.5).abs();
            (dx + dy <= 5.5, rect(x, y, 7, 8, 3, 4), 9)
        }
        "jug" => (y <= 14 && dist(x, y, 8.0, 9.5) <= 5.0, rect(x, y, 6, 9, 3, 4), 9),
        _ => (dist(x, y, 8.0, 10.0) <= 4.8, rect(x, y, 7, 8, 3, 5), 9),
    };

    if in_body {
        return Some(if y >= liquid_line { Part::Liquid } else { Part::Body });
    }
    if neck {
        return Some(Part::Body);
    }
    match l.key {
        "ornate_bottle" if dist(x, y, 8.0, 2.0) <= 1.2 => Some(l.gem()),
        "jug" if rect(x, y, 13, 14, 6, 10) && !rect(x, y, 13, 13, 7, 9) => Some(Part::Handle),
        "jug" if rect(x, y, 6, 9, 2, 2) => Some(Part::Handle),
        "ornate_bottle" | "jug" => None,
        _ if rect(x, y, 7, 8, 1, 2) => Some(Part::Handle),
        _ => None,
    }
}

fn part_at(family: VisualFamily, layout: &Layout<'_>, x: i32, y: i32) -> Option<Part> {
    match family {
        VisualFamily::Sword => sword(layout, x, y),
        VisualFamily::Axe => axe(layout, x, y),
        VisualFamily::Blunt => blunt(layout, x, y),
        VisualFamily::Bow => bow(layout, x, y),
        VisualFamily::Staff => staff(layout, x, y),
        VisualFamily::Armor => armor(layout, x, y),
        VisualFamily::Robe => robe(layout, x, y),
        VisualFamily::Shield => shield(layout, x, y),
        VisualFamily::Headwear => headwear(layout, x, y),
        VisualFamily::Gloves => gloves(layout, x, y),
        VisualFamily::Footwear => footwear(layout, x, y),
        VisualFamily::Jewelry => jewelry(layout, x, y),
        VisualFamily::Book => book(layout, x, y),
        VisualFamily::Potion => potion(layout, x, y),
    }
}

fn scale(rgb: [u8; 3], factor: f64) -> [u8; 3] {
    rgb.map(|c| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8)
}

fn lighten(rgb: [u8; 3], amount: f64) -> [u8; 3] {
    rgb.map(|c| (f64::from(c) + (255.0 - f64::from(c)) * amount).round().clamp(0.0, 255.0) as u8)
}

fn luminance(rgb: [u8; 3]) -> f64 {
    0.299 * f64::from(rgb[0]) + 0.587 * f64::from(rgb[1]) + 0.114 * f64::from(rgb[2])
}

/// A contrasting shade for trim and details
fn accent_of(rgb: [u8; 3]) -> [u8; 3] {
    if luminance(rgb) < 90.0 {
        lighten(rgb, 0.45)
    } else {
        scale(rgb, 0.65)
    }
}

fn liquid_for(sub_type_id: &str, rng: &mut dyn RngCore) -> (&'static str, [u8; 3]) {
    let named = if sub_type_id.contains("healing") {
        Some("crimson")
    } else if sub_type_id.contains("mana") {
        Some("azure")
    } else if sub_type_id.contains("elixir") {
        Some("gold")
    } else {
        None
    };

    named
        .and_then(|name| LIQUIDS.iter().find(|(n, _)| *n == name))
        .or_else(|| LIQUIDS[3..].choose(rng))
        .copied()
        .unwrap_or(LIQUIDS[3])
}

/// Encode an RGBA image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    use std::io::Cursor;

    let mut buffer = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(Cursor::new(&mut buffer));

    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;

    Ok(buffer)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Procedural sprite generator
#[derive(Debug, Clone, Copy)]
pub struct PixelArtGenerator {
    size: u32,
}

impl Default for PixelArtGenerator {
    fn default() -> Self {
        Self::new(GRID)
    }
}

impl PixelArtGenerator {
    pub const MIN_SIZE: u32 = 8;
    pub const MAX_SIZE: u32 = 256;

    pub fn new(size: u32) -> Self {
        Self { size }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Draw the sprite and collect its metadata
    fn render(&self, request: &ArtRequest<'_>, rng: &mut dyn RngCore) -> (RgbaImage, Map<String, Value>) {
        let complexity = request.complexity.clamp(1, 5);
        let gem_roll = match complexity {
            1 | 2 => false,
            3 => rng.gen_bool(0.5),
            _ => true,
        };
        let robe = RobeStyle::ALL.choose(rng).copied().unwrap_or(RobeStyle::Straight);
        let layout = Layout { key: request.sub_type, has_gem: gem_roll, robe };

        let base = palette_rgb(request.palette);
        let accent = accent_of(base);
        let (gem_name, gem_rgb) = GEMS.choose(rng).copied().unwrap_or(GEMS[0]);
        let sub_type_id = request.hints.get("subTypeId").and_then(Value::as_str).unwrap_or(request.sub_type);
        let (liquid_name, liquid_rgb) = liquid_for(sub_type_id, rng);
        let glassy = request.family == VisualFamily::Potion;

        let grain = Perlin::new(rng.next_u32());
        let mut image = RgbaImage::new(self.size, self.size);
        let mut drew_gem = false;

        for py in 0..self.size {
            for px in 0..self.size {
                let gx = (px * GRID / self.size) as i32;
                let gy = (py * GRID / self.size) as i32;
                let Some(part) = part_at(request.family, &layout, gx, gy) else {
                    continue;
                };

                let shade = 1.0 + 0.12 * grain.get([f64::from(px) * 0.37 + 0.5, f64::from(py) * 0.37 + 0.5]);
                let (rgb, alpha) = match part {
                    Part::Body if glassy => (lighten(base, 0.2), 170),
                    Part::Body => {
                        let shimmer = complexity >= 5 && (gx + 2 * gy) % 9 == 0;
                        (if shimmer { lighten(base, 0.4) } else { scale(base, shade) }, 255)
                    }
                    Part::Accent => (accent, 255),
                    Part::Handle => (scale(HANDLE, shade), 255),
                    Part::Gem => {
                        drew_gem = true;
                        (gem_rgb, 255)
                    }
                    Part::Liquid => (scale(liquid_rgb, shade), 230),
                    Part::Paper => (PAPER, 255),
                };
                image.put_pixel(px, py, Rgba([rgb[0], rgb[1], rgb[2], alpha]));
            }
        }

        if complexity >= 2 {
            outline(&mut image);
        }

        let mut item_data = Map::new();
        item_data.insert("family".to_string(), Value::from(request.family.name()));
        item_data.insert("hasGem".to_string(), Value::from(drew_gem));
        if drew_gem {
            item_data.insert("gemMaterial".to_string(), Value::from(gem_name));
        }
        match request.family {
            VisualFamily::Robe => {
                item_data.insert("robeBodyStyle".to_string(), Value::from(robe.name()));
            }
            VisualFamily::Potion => {
                item_data.insert("liquidColor".to_string(), Value::from(liquid_name));
            }
            _ => {}
        }
        item_data.insert("width".to_string(), Value::from(self.size));
        item_data.insert("height".to_string(), Value::from(self.size));

        (image, item_data)
    }
}

/// Darken empty pixels that touch the sprite
fn outline(image: &mut RgbaImage) {
    let (width, height) = image.dimensions();
    let filled = |img: &RgbaImage, x: i64, y: i64| {
        x >= 0
            && y >= 0
            && x < i64::from(width)
            && y < i64::from(height)
            && img.get_pixel(x as u32, y as u32)[3] > 0
    };

    let source: &RgbaImage = image;
    let mut edges = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if source.get_pixel(x, y)[3] > 0 {
                continue;
            }
            let (xi, yi) = (i64::from(x), i64::from(y));
            if filled(source, xi - 1, yi)
                || filled(source, xi + 1, yi)
                || filled(source, xi, yi - 1)
                || filled(source, xi, yi + 1)
            {
                edges.push((x, y));
            }
        }
    }

    for (x, y) in edges {
        image.put_pixel(x, y, Rgba([OUTLINE[0], OUTLINE[1], OUTLINE[2], 255]));
    }
}

impl ArtGenerator for PixelArtGenerator {
    fn generate(&self, request: &ArtRequest<'_>, rng: &mut dyn RngCore) -> Result<ArtOutput, ArtError> {
        if !(Self::MIN_SIZE..=Self::MAX_SIZE).contains(&self.size) {
            return Err(ArtError::InvalidSize(self.size));
        }

        let (image, item_data) = self.render(request, rng);
        let png = encode_png(&image)?;

        Ok(ArtOutput {
            image_data_url: png_data_url(&png),
            item_data,
        })
    }
}
