//! Bright-star table backing [`StaticCatalog`](super::StaticCatalog).
//!
//! J2000 positions, degrees. Immutable for the life of the process.

use crate::models::{CatalogEntry, EquatorialCoordinate};

const fn star(
    object_id: &'static str,
    canonical_name: &'static str,
    ra_deg: f64,
    dec_deg: f64,
    aliases: &'static [&'static str],
) -> CatalogEntry {
    CatalogEntry {
        object_id,
        canonical_name,
        coordinates: EquatorialCoordinate::new_unchecked(ra_deg, dec_deg),
        aliases,
    }
}

pub static BRIGHT_STARS: [CatalogEntry; 10] = [
    star("HIP 32349", "Sirius", 101.2875, -16.7161, &["alpha CMa", "Dog Star"]),
    star("HIP 30438", "Canopus", 95.9879, -52.6957, &["alpha Car"]),
    star(
        "HIP 71683",
        "Rigil Kentaurus",
        219.9021,
        -60.8339,
        &["Alpha Centauri", "alpha Cen"],
    ),
    star("HIP 69673", "Arcturus", 213.9154, 19.1824, &["alpha Boo"]),
    star("HIP 91262", "Vega", 279.2347, 38.7837, &["alpha Lyr"]),
    star("HIP 11767", "Polaris", 37.9546, 89.2641, &["alpha UMi", "North Star"]),
    star("HIP 24436", "Rigel", 78.6345, -8.2016, &["beta Ori"]),
    star("HIP 27989", "Betelgeuse", 88.7929, 7.4071, &["alpha Ori"]),
    star("HIP 37279", "Procyon", 114.8255, 5.2249, &["alpha CMi"]),
    star("HIP 97649", "Altair", 297.6958, 8.8683, &["alpha Aql"]),
];
