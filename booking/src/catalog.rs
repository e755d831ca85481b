//! Static ground catalog.
//!
//! The catalog is immutable for the process lifetime and defined at
//! startup. Lookup is a linear scan: the list is a handful of venues, not
//! a dataset.

use crate::types::{Ground, GroundId, Money, Sport};

/// The read-only list of bookable venues
#[derive(Clone, Debug)]
pub struct GroundCatalog {
    grounds: Vec<Ground>,
}

impl GroundCatalog {
    /// Creates a catalog from an explicit list of grounds
    #[must_use]
    pub const fn new(grounds: Vec<Ground>) -> Self {
        Self { grounds }
    }

    /// The built-in demo catalog, covering all five sport categories
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            entry(
                "ground-alpha-cricket",
                "Alpha Arena",
                "Downtown Core",
                1200,
                Sport::Cricket,
                "alpha",
                &["Indoor Turf", "Floodlights", "Seating Area", "Washrooms"],
                Some(4.7),
            ),
            entry(
                "ground-beta-cricket",
                "Beta Box Park",
                "West Suburbs",
                1000,
                Sport::Cricket,
                "beta",
                &["Outdoor Astroturf", "Night Lights", "Parking", "Practice Nets"],
                Some(4.3),
            ),
            entry(
                "ground-gamma-cricket",
                "Gamma Cricket Hub",
                "East Industrial",
                1150,
                Sport::Cricket,
                "gamma",
                &["Indoor Turf", "Electronic Scoring", "Drinking Water", "Large Parking"],
                Some(4.5),
            ),
            entry(
                "ground-delta-pickleball",
                "Delta Pickle Courts",
                "Riverside Commons",
                800,
                Sport::Pickleball,
                "delta",
                &["Hard Courts", "Rental Rackets", "Good Lighting", "Cafe Nearby"],
                Some(4.6),
            ),
            entry(
                "ground-epsilon-volleyball",
                "Epsilon Sand Courts",
                "North Beachfront",
                900,
                Sport::Volleyball,
                "epsilon",
                &["Beach Access", "Netting", "Showers", "Snack Bar"],
                Some(4.2),
            ),
            entry(
                "ground-zeta-basketball",
                "Zeta Hoops Centre",
                "Midtown Mall Rooftop",
                1100,
                Sport::Basketball,
                "zeta",
                &["Wooden Courts", "Adjustable Hoops", "Scoreboard", "Changing Rooms"],
                None,
            ),
            entry(
                "ground-eta-badminton",
                "Eta Shuttle House",
                "South Tech Park",
                700,
                Sport::Badminton,
                "eta",
                &["Wooden Courts", "Equipment Rental", "Good Lighting", "Washrooms"],
                Some(4.8),
            ),
        ])
    }

    /// All grounds, in catalog order
    #[must_use]
    pub fn all(&self) -> &[Ground] {
        &self.grounds
    }

    /// Find a ground by identifier (linear scan)
    #[must_use]
    pub fn find(&self, id: &GroundId) -> Option<&Ground> {
        self.grounds.iter().find(|ground| &ground.id == id)
    }

    /// Number of grounds in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.grounds.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grounds.is_empty()
    }
}

impl Default for GroundCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[allow(clippy::too_many_arguments)] // Catalog rows read best as flat argument lists
fn entry(
    id: &str,
    name: &str,
    location: &str,
    rupees_per_hour: u64,
    sport: Sport,
    image_seed: &str,
    amenities: &[&str],
    rating: Option<f32>,
) -> Ground {
    Ground {
        id: GroundId::new(id),
        name: name.to_string(),
        location: location.to_string(),
        price_per_hour: Money::from_rupees(rupees_per_hour),
        sport,
        image_urls: vec![
            format!("https://picsum.photos/seed/{image_seed}/400/300"),
            format!("https://picsum.photos/seed/{image_seed}-court/400/300"),
        ],
        amenities: amenities.iter().map(ToString::to_string).collect(),
        rating,
    }
}
