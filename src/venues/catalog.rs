//! Bundled fallback venues.
//!
//! The last retrieval tier. Always available, needs no network, and knows
//! a few places for each of the default cuisines. Each lookup nudges
//! ratings and distances a little so repeated fallbacks don't look frozen.

use tracing::debug;

use crate::random::RandomSource;
use crate::types::{Distance, VenueRecord, VenueSource};

/// Ratings never jitter below this.
pub const MIN_RATING: f64 = 3.5;
/// Distances never jitter below this many miles.
pub const MIN_DISTANCE_MILES: f64 = 0.1;
/// Total width of the rating jitter (±0.2).
pub const RATING_JITTER: f64 = 0.4;
/// Total width of the distance jitter (±0.25 mi).
pub const DISTANCE_JITTER: f64 = 0.5;

const PLACEHOLDER_IMAGE: &str = "/api/placeholder/400/300";

/// A fixed catalog row.
pub struct CatalogVenue {
    pub id: &'static str,
    pub name: &'static str,
    pub cuisine: &'static str,
    pub rating: f64,
    pub price_tier: u8,
    pub distance_miles: f64,
    pub address: &'static str,
    pub phone: Option<&'static str>,
    pub website: Option<&'static str>,
    pub is_open: bool,
    pub description: &'static str,
}

impl CatalogVenue {
    fn to_record(&self) -> VenueRecord {
        VenueRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            cuisine: self.cuisine.to_string(),
            rating: self.rating,
            price_tier: self.price_tier,
            distance: Distance::from_miles(self.distance_miles),
            address: self.address.to_string(),
            phone: self.phone.map(String::from),
            website: self.website.map(String::from),
            image_url: Some(PLACEHOLDER_IMAGE.to_string()),
            is_open: Some(self.is_open),
            description: Some(self.description.to_string()),
            source: VenueSource::StaticCatalog,
        }
    }
}

macro_rules! venue {
    ($id:literal, $name:literal, $cuisine:literal, $rating:literal, $price:literal,
     $miles:literal, $addr:literal, $phone:expr, $site:expr, $open:literal, $desc:literal) => {
        CatalogVenue {
            id: $id,
            name: $name,
            cuisine: $cuisine,
            rating: $rating,
            price_tier: $price,
            distance_miles: $miles,
            address: $addr,
            phone: $phone,
            website: $site,
            is_open: $open,
            description: $desc,
        }
    };
}

pub const CATALOG: &[CatalogVenue] = &[
    venue!("italian-1", "Marco's Authentic Italian", "Italian", 4.8, 3, 0.8,
        "123 Little Italy St, Downtown", Some("(555) 123-4567"), Some("https://marcos-italian.com"), true,
        "Family-owned restaurant serving traditional Italian dishes with fresh pasta made daily."),
    venue!("italian-2", "Bella Vista Ristorante", "Italian", 4.6, 4, 1.2,
        "456 Tuscan Ave, Uptown", Some("(555) 234-5678"), Some("https://bellavista.com"), true,
        "Upscale Italian dining with panoramic city views and an extensive wine selection."),
    venue!("italian-3", "Luigi's Pizza & Pasta", "Italian", 4.4, 2, 2.1,
        "789 Roma Boulevard, East Side", Some("(555) 345-6789"), None, false,
        "Casual Italian spot famous for wood-fired pizza and homemade pasta."),
    venue!("mexican-1", "Casa de Tacos", "Mexican", 4.7, 2, 0.5,
        "321 Cinco de Mayo St, Centro", Some("(555) 456-7890"), None, true,
        "Authentic Mexican cuisine with handmade tortillas and fresh salsas."),
    venue!("mexican-2", "El Mariachi Loco", "Mexican", 4.5, 3, 1.8,
        "654 Azteca Road, Westside", Some("(555) 567-8901"), Some("https://elmariachiloco.com"), true,
        "Festive atmosphere with live mariachi music and premium tequila selection."),
    venue!("chinese-1", "Golden Dragon", "Chinese", 4.6, 2, 1.0,
        "888 Dynasty Drive, Chinatown", Some("(555) 678-9012"), None, true,
        "Traditional Cantonese cuisine with dim sum served daily until 3 PM."),
    venue!("chinese-2", "Szechuan Palace", "Chinese", 4.4, 3, 2.3,
        "456 Spice Street, North Quarter", Some("(555) 789-0123"), None, true,
        "Authentic Szechuan flavors with bold spices and traditional hot pot."),
    venue!("indian-1", "Taj Mahal Palace", "Indian", 4.8, 3, 1.5,
        "777 Curry Lane, Spice District", Some("(555) 890-1234"), Some("https://tajmahalpalace.com"), true,
        "Royal Indian dining experience with traditional tandoor dishes and rich curries."),
    venue!("indian-2", "Bombay Street Kitchen", "Indian", 4.5, 2, 0.9,
        "212 Masala Row, Market District", Some("(555) 891-2345"), None, true,
        "Street-food favorites, fresh naan from the tandoor and a lunchtime thali."),
    venue!("thai-1", "Bangkok Garden", "Thai", 4.7, 2, 0.9,
        "234 Lotus Street, Asian Quarter", Some("(555) 901-2345"), None, true,
        "Fresh Thai cuisine with customizable spice levels and vegetarian options."),
    venue!("thai-2", "Chiang Mai Noodle House", "Thai", 4.5, 1, 1.6,
        "98 Riverside Walk, Old Town", Some("(555) 902-3456"), None, true,
        "Northern Thai noodle soups, khao soi and grilled skewers at neighborhood prices."),
    venue!("japanese-1", "Sakura Sushi Bar", "Japanese", 4.9, 4, 1.7,
        "567 Zen Avenue, Modern District", Some("(555) 012-3456"), Some("https://sakurasushi.com"), true,
        "Premium sushi and sashimi with daily fresh fish flown in from Japan."),
    venue!("japanese-2", "Tonkotsu Ramen Works", "Japanese", 4.6, 2, 0.7,
        "41 Alley Lane, Arts District", Some("(555) 013-4567"), None, true,
        "Rich pork-bone ramen simmered for eighteen hours, plus gyoza and rice bowls."),
    venue!("med-1", "Olive Branch Taverna", "Mediterranean", 4.6, 3, 1.3,
        "890 Harbor View, Coastal Area", Some("(555) 123-4567"), None, true,
        "Fresh Mediterranean flavors with grilled seafood and traditional mezze."),
    venue!("med-2", "Falafel Corner", "Mediterranean", 4.4, 1, 0.6,
        "17 Market Square, Downtown", Some("(555) 124-5678"), None, true,
        "Counter-service falafel, shawarma wraps and hummus made fresh every morning."),
    venue!("burger-1", "The Burger Joint", "Burgers", 4.5, 2, 0.6,
        "345 Grill Street, Downtown", Some("(555) 234-5678"), None, true,
        "Gourmet burgers with grass-fed beef and artisanal toppings."),
    venue!("burger-2", "Stack Shack", "Burgers", 4.3, 1, 1.4,
        "66 Route Road, Midtown", Some("(555) 235-6789"), None, false,
        "Late-night smash burgers, crinkle fries and thick milkshakes."),
    venue!("pizza-1", "Artisan Pizza Co.", "Pizza", 4.7, 2, 1.1,
        "678 Dough Street, Little Italy", Some("(555) 345-6789"), None, true,
        "Wood-fired Neapolitan pizza with locally sourced ingredients."),
    venue!("pizza-2", "Slice of Brooklyn", "Pizza", 4.4, 1, 0.4,
        "12 Fulton Ave, Downtown", Some("(555) 346-7890"), None, true,
        "New York style slices, garlic knots and square grandma pies."),
    venue!("bbq-1", "Smoky Joe's BBQ", "BBQ", 4.8, 2, 2.0,
        "901 Smoke House Lane, South Side", Some("(555) 456-7890"), None, true,
        "Low and slow smoked meats with homemade sauces and classic sides."),
    venue!("bbq-2", "Hickory Pit", "BBQ", 4.5, 2, 3.1,
        "4 Ember Road, Industrial Park", Some("(555) 457-8901"), None, true,
        "Texas-style brisket and burnt ends, sold by the pound until they run out."),
    venue!("vegan-1", "Green Earth Cafe", "Vegan", 4.6, 2, 1.4,
        "234 Plant Street, Eco District", Some("(555) 567-8901"), None, true,
        "Plant-based cuisine with creative dishes and organic ingredients."),
    venue!("vegan-2", "Sprout & Soil", "Vegan", 4.4, 2, 0.8,
        "55 Garden Path, Uptown", Some("(555) 568-9012"), None, true,
        "Seasonal grain bowls, cold-pressed juices and dairy-free desserts."),
    venue!("seafood-1", "Ocean's Bounty", "Seafood", 4.7, 4, 2.5,
        "567 Pier Avenue, Waterfront", Some("(555) 678-9012"), Some("https://oceansbounty.com"), true,
        "Fresh daily catch with spectacular ocean views and raw bar."),
    venue!("seafood-2", "The Salty Anchor", "Seafood", 4.5, 3, 1.9,
        "23 Dockside Lane, Harbor District", Some("(555) 679-0123"), None, true,
        "Oyster bar, lobster rolls and chowder served steps from the fishing boats."),
];

/// The static fallback tier.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Catalog rows for `cuisine`, without jitter. Exact, case-sensitive match.
    pub fn base_entries<'a>(
        &self,
        cuisine: &'a str,
    ) -> impl Iterator<Item = &'static CatalogVenue> + 'a {
        CATALOG.iter().filter(move |v| v.cuisine == cuisine)
    }

    /// Venues for `cuisine` with fresh jitter applied. Empty for an
    /// unknown cuisine.
    pub fn venues(&self, cuisine: &str, rng: &mut dyn RandomSource) -> Vec<VenueRecord> {
        let venues: Vec<VenueRecord> = self
            .base_entries(cuisine)
            .map(|row| {
                let mut record = row.to_record();
                record.rating = jitter_rating(row.rating, rng);
                record.distance = Distance::from_miles(jitter_miles(row.distance_miles, rng));
                record
            })
            .collect();

        debug!(cuisine, count = venues.len(), "Serving venues from static catalog");
        venues
    }

    /// Cuisines the catalog knows about, in catalog order.
    pub fn cuisines(&self) -> Vec<&'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        for row in CATALOG {
            if !seen.contains(&row.cuisine) {
                seen.push(row.cuisine);
            }
        }
        seen
    }
}

fn jitter_rating(rating: f64, rng: &mut dyn RandomSource) -> f64 {
    (rating + (rng.next_f64() - 0.5) * RATING_JITTER).max(MIN_RATING)
}

fn jitter_miles(miles: f64, rng: &mut dyn RandomSource) -> f64 {
    (miles + (rng.next_f64() - 0.5) * DISTANCE_JITTER).max(MIN_DISTANCE_MILES)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
