//! Cuisine wheel contents and the dish catalog.
//!
//! The cuisine wheel always starts from the same twelve cuisines. Each
//! cuisine carries eight dish options that feed the dish wheel once a
//! cuisine has been picked.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::random::RandomSource;

/// Cuisines on the default wheel, in wheel order.
pub const DEFAULT_CUISINES: [&str; 12] = [
    "Italian",
    "Mexican",
    "Chinese",
    "Indian",
    "Thai",
    "Japanese",
    "Mediterranean",
    "Burgers",
    "Pizza",
    "BBQ",
    "Vegan",
    "Seafood",
];

/// Dish options shown on the dish wheel by default.
pub const DEFAULT_DISH_COUNT: usize = 8;

const MIN_POPULARITY: f64 = 1.0;
const MAX_POPULARITY: f64 = 5.0;
/// Total width of the popularity jitter (±0.25).
const POPULARITY_JITTER: f64 = 0.5;
/// Total width of the ranking noise (±0.5).
const RANKING_NOISE: f64 = 1.0;

// ---------------------------------------------------------------------------
// Dish types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DishKind {
    Dish,
    /// A kind of place to go rather than something to order.
    Restaurant,
    /// A way of eating rather than a single plate (hot pot).
    Style,
}

/// One option on the dish wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishOption {
    pub id: String,
    pub cuisine: String,
    pub name: String,
    pub kind: DishKind,
    /// 1–5.
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<u8>,
    #[serde(default)]
    pub dietary: Vec<String>,
    pub emoji: String,
    pub description: String,
}

struct CatalogDish {
    id: &'static str,
    cuisine: &'static str,
    name: &'static str,
    kind: DishKind,
    popularity: f64,
    spice_level: Option<u8>,
    dietary: &'static [&'static str],
    emoji: &'static str,
    description: &'static str,
}

impl CatalogDish {
    fn to_option(&self) -> DishOption {
        DishOption {
            id: self.id.to_string(),
            cuisine: self.cuisine.to_string(),
            name: self.name.to_string(),
            kind: self.kind,
            popularity: self.popularity,
            spice_level: self.spice_level,
            dietary: self.dietary.iter().map(|d| d.to_string()).collect(),
            emoji: self.emoji.to_string(),
            description: self.description.to_string(),
        }
    }
}

macro_rules! dish {
    ($id:literal, $cuisine:literal, $name:literal, $kind:ident, $pop:literal,
     $spice:expr, $dietary:expr, $emoji:literal, $desc:literal) => {
        CatalogDish {
            id: $id,
            cuisine: $cuisine,
            name: $name,
            kind: DishKind::$kind,
            popularity: $pop,
            spice_level: $spice,
            dietary: $dietary,
            emoji: $emoji,
            description: $desc,
        }
    };
}

const DISHES: &[CatalogDish] = &[
    dish!("italian-1", "Italian", "Pizza Margherita", Dish, 5.0, None, &["vegetarian"], "🍕",
        "Classic Italian pizza with tomato, mozzarella, and basil"),
    dish!("italian-2", "Italian", "Spaghetti Carbonara", Dish, 4.0, None, &[], "🍝",
        "Creamy pasta with eggs, cheese, pancetta, and black pepper"),
    dish!("italian-3", "Italian", "Lasagna", Dish, 4.0, None, &[], "🍝",
        "Layered pasta with meat sauce, cheese, and bechamel"),
    dish!("italian-4", "Italian", "Risotto", Dish, 3.0, None, &["vegetarian"], "🍚",
        "Creamy rice dish with various seasonal ingredients"),
    dish!("italian-5", "Italian", "Osso Buco", Dish, 3.0, None, &[], "🍖",
        "Braised veal shanks with vegetables and broth"),
    dish!("italian-6", "Italian", "Tiramisu", Dish, 5.0, None, &["vegetarian"], "🍰",
        "Coffee-flavored dessert with mascarpone and ladyfingers"),
    dish!("italian-7", "Italian", "Antipasto Platter", Dish, 4.0, None, &[], "🧀",
        "Traditional Italian appetizer selection"),
    dish!("italian-8", "Italian", "Gelato", Dish, 5.0, None, &["vegetarian"], "🍨",
        "Italian-style ice cream with intense flavors"),
    dish!("mexican-1", "Mexican", "Tacos al Pastor", Dish, 5.0, Some(3), &[], "🌮",
        "Marinated pork tacos with pineapple and onions"),
    dish!("mexican-2", "Mexican", "Guacamole & Chips", Dish, 5.0, Some(2), &["vegetarian", "vegan"], "🥑",
        "Fresh avocado dip with crispy tortilla chips"),
    dish!("mexican-3", "Mexican", "Chicken Enchiladas", Dish, 4.0, Some(3), &[], "🌯",
        "Rolled tortillas filled with chicken and covered in sauce"),
    dish!("mexican-4", "Mexican", "Carne Asada", Dish, 4.0, Some(2), &[], "🥩",
        "Grilled skirt steak with traditional seasonings"),
    dish!("mexican-5", "Mexican", "Churros", Dish, 5.0, None, &["vegetarian"], "🍩",
        "Fried dough pastry with cinnamon sugar"),
    dish!("mexican-6", "Mexican", "Pozole", Dish, 3.0, Some(3), &[], "🍲",
        "Traditional soup with hominy and meat"),
    dish!("mexican-7", "Mexican", "Quesadillas", Dish, 4.0, Some(2), &["vegetarian"], "🧀",
        "Grilled tortillas filled with cheese and other ingredients"),
    dish!("mexican-8", "Mexican", "Mexican Street Corn", Dish, 4.0, Some(2), &["vegetarian"], "🌽",
        "Grilled corn with mayo, cheese, and chili powder"),
    dish!("chinese-1", "Chinese", "Sweet & Sour Pork", Dish, 4.0, Some(1), &[], "🍖",
        "Crispy pork with bell peppers in tangy sauce"),
    dish!("chinese-2", "Chinese", "Kung Pao Chicken", Dish, 4.0, Some(4), &[], "🐔",
        "Spicy stir-fried chicken with peanuts and vegetables"),
    dish!("chinese-3", "Chinese", "Fried Rice", Dish, 5.0, Some(1), &["vegetarian"], "🍚",
        "Wok-fried rice with eggs, vegetables, and soy sauce"),
    dish!("chinese-4", "Chinese", "Dim Sum", Dish, 4.0, Some(1), &[], "🥟",
        "Variety of small steamed and fried dishes"),
    dish!("chinese-5", "Chinese", "Hot Pot", Style, 4.0, Some(3), &[], "🍲",
        "Interactive dining with simmering broth and fresh ingredients"),
    dish!("chinese-6", "Chinese", "Peking Duck", Dish, 3.0, Some(1), &[], "🦆",
        "Roasted duck with pancakes, sauce, and scallions"),
    dish!("chinese-7", "Chinese", "Mapo Tofu", Dish, 3.0, Some(5), &["vegetarian"], "🌶️",
        "Spicy Sichuan tofu in chili and bean sauce"),
    dish!("chinese-8", "Chinese", "Spring Rolls", Dish, 4.0, Some(1), &["vegetarian"], "🌯",
        "Crispy rolls filled with vegetables or meat"),
    dish!("indian-1", "Indian", "Butter Chicken", Dish, 5.0, Some(2), &[], "🍛",
        "Creamy tomato-based curry with tender chicken"),
    dish!("indian-2", "Indian", "Biryani", Dish, 5.0, Some(3), &[], "🍚",
        "Fragrant rice dish with spices, meat, or vegetables"),
    dish!("indian-3", "Indian", "Naan Bread", Dish, 5.0, Some(1), &["vegetarian"], "🫓",
        "Soft, pillowy flatbread baked in tandoor oven"),
    dish!("indian-4", "Indian", "Samosas", Dish, 4.0, Some(2), &["vegetarian"], "🥟",
        "Crispy pastries filled with spiced potatoes or meat"),
    dish!("indian-5", "Indian", "Vindaloo", Dish, 3.0, Some(5), &[], "🌶️",
        "Very spicy curry with vinegar and garlic"),
    dish!("indian-6", "Indian", "Tandoori Chicken", Dish, 4.0, Some(3), &[], "🐔",
        "Yogurt-marinated chicken cooked in clay oven"),
    dish!("indian-7", "Indian", "Dal", Dish, 4.0, Some(2), &["vegetarian", "vegan"], "🍲",
        "Spiced lentil curry, comfort food of India"),
    dish!("indian-8", "Indian", "Mango Lassi", Dish, 4.0, Some(1), &["vegetarian"], "🥭",
        "Sweet yogurt drink with mango"),
    dish!("thai-1", "Thai", "Pad Thai", Dish, 5.0, Some(2), &[], "🍜",
        "Stir-fried rice noodles with tamarind and peanuts"),
    dish!("thai-2", "Thai", "Green Curry", Dish, 4.0, Some(4), &[], "🍛",
        "Spicy coconut curry with green chilies and basil"),
    dish!("thai-3", "Thai", "Tom Yum Soup", Dish, 4.0, Some(4), &[], "🍲",
        "Hot and sour soup with lemongrass and lime"),
    dish!("thai-4", "Thai", "Mango Sticky Rice", Dish, 4.0, Some(1), &["vegetarian", "vegan"], "🥭",
        "Sweet dessert with coconut milk and fresh mango"),
    dish!("thai-5", "Thai", "Thai Basil Chicken", Dish, 4.0, Some(4), &[], "🐔",
        "Spicy stir-fry with holy basil and chilies"),
    dish!("thai-6", "Thai", "Som Tam", Dish, 3.0, Some(4), &["vegetarian", "vegan"], "🥗",
        "Spicy green papaya salad with lime and chilies"),
    dish!("thai-7", "Thai", "Massaman Curry", Dish, 3.0, Some(2), &[], "🍛",
        "Rich, mild curry with potatoes and peanuts"),
    dish!("thai-8", "Thai", "Thai Fried Rice", Dish, 4.0, Some(2), &[], "🍚",
        "Jasmine rice stir-fried with Thai seasonings"),
    dish!("japanese-1", "Japanese", "Sushi", Dish, 5.0, Some(1), &[], "🍣",
        "Fresh fish and rice, the art of Japanese cuisine"),
    dish!("japanese-2", "Japanese", "Ramen", Dish, 5.0, Some(2), &[], "🍜",
        "Rich broth with noodles, meat, and vegetables"),
    dish!("japanese-3", "Japanese", "Tempura", Dish, 4.0, Some(1), &[], "🍤",
        "Light, crispy battered and fried seafood or vegetables"),
    dish!("japanese-4", "Japanese", "Yakitori", Dish, 4.0, Some(1), &[], "🍢",
        "Grilled chicken skewers with tare sauce"),
    dish!("japanese-5", "Japanese", "Miso Soup", Dish, 4.0, Some(1), &["vegetarian"], "🍲",
        "Traditional soybean paste soup with tofu and seaweed"),
    dish!("japanese-6", "Japanese", "Katsu", Dish, 4.0, Some(1), &[], "🍖",
        "Breaded and fried cutlet, usually pork or chicken"),
    dish!("japanese-7", "Japanese", "Onigiri", Dish, 3.0, Some(1), &["vegetarian"], "🍙",
        "Rice balls with various fillings, wrapped in seaweed"),
    dish!("japanese-8", "Japanese", "Matcha Ice Cream", Dish, 4.0, Some(1), &["vegetarian"], "🍦",
        "Green tea flavored ice cream, uniquely Japanese"),
    dish!("med-1", "Mediterranean", "Greek Salad", Dish, 4.0, Some(1), &["vegetarian"], "🥗",
        "Fresh vegetables with feta cheese and olive oil"),
    dish!("med-2", "Mediterranean", "Hummus & Pita", Dish, 5.0, Some(1), &["vegetarian", "vegan"], "🧆",
        "Creamy chickpea dip with warm flatbread"),
    dish!("med-3", "Mediterranean", "Gyros", Dish, 4.0, Some(2), &[], "🌯",
        "Seasoned meat in pita with tzatziki sauce"),
    dish!("med-4", "Mediterranean", "Falafel", Dish, 4.0, Some(2), &["vegetarian", "vegan"], "🧆",
        "Fried chickpea balls with herbs and spices"),
    dish!("med-5", "Mediterranean", "Paella", Dish, 3.0, Some(2), &[], "🥘",
        "Spanish rice dish with saffron and various proteins"),
    dish!("med-6", "Mediterranean", "Baklava", Dish, 4.0, Some(1), &["vegetarian"], "🍯",
        "Sweet pastry with nuts and honey syrup"),
    dish!("med-7", "Mediterranean", "Tabbouleh", Dish, 3.0, Some(1), &["vegetarian", "vegan"], "🥗",
        "Fresh parsley salad with bulgur, tomatoes, and lemon"),
    dish!("med-8", "Mediterranean", "Stuffed Grape Leaves", Dish, 3.0, Some(1), &["vegetarian", "vegan"], "🍃",
        "Rice and herbs wrapped in grape leaves"),
    dish!("burger-1", "Burgers", "Classic Cheeseburger", Dish, 5.0, Some(1), &[], "🍔",
        "Beef patty with cheese, lettuce, tomato, and pickles"),
    dish!("burger-2", "Burgers", "Bacon Burger", Dish, 4.0, Some(1), &[], "🥓",
        "Juicy burger topped with crispy bacon strips"),
    dish!("burger-3", "Burgers", "Veggie Burger", Dish, 3.0, Some(1), &["vegetarian"], "🥬",
        "Plant-based patty with fresh vegetables"),
    dish!("burger-4", "Burgers", "BBQ Burger", Dish, 4.0, Some(2), &[], "🔥",
        "Smoky burger with BBQ sauce and onion rings"),
    dish!("burger-5", "Burgers", "Mushroom Swiss Burger", Dish, 3.0, Some(1), &[], "🍄",
        "Beef patty with sautéed mushrooms and Swiss cheese"),
    dish!("burger-6", "Burgers", "Spicy Jalapeño Burger", Dish, 3.0, Some(4), &[], "🌶️",
        "Hot burger with jalapeños and pepper jack cheese"),
    dish!("burger-7", "Burgers", "Turkey Burger", Dish, 3.0, Some(1), &[], "🦃",
        "Lean turkey patty with avocado and sprouts"),
    dish!("burger-8", "Burgers", "Slider Trio", Dish, 4.0, Some(1), &[], "🍔",
        "Three mini burgers with different toppings"),
    dish!("pizza-1", "Pizza", "Margherita Pizza", Dish, 5.0, Some(1), &["vegetarian"], "🍕",
        "Classic with tomato sauce, mozzarella, and fresh basil"),
    dish!("pizza-2", "Pizza", "Pepperoni Pizza", Dish, 5.0, Some(2), &[], "🍕",
        "America's favorite with spicy pepperoni slices"),
    dish!("pizza-3", "Pizza", "Meat Lovers Pizza", Dish, 4.0, Some(2), &[], "🥩",
        "Loaded with pepperoni, sausage, bacon, and ham"),
    dish!("pizza-4", "Pizza", "Veggie Supreme", Dish, 3.0, Some(1), &["vegetarian"], "🥬",
        "Bell peppers, mushrooms, onions, olives, and tomatoes"),
    dish!("pizza-5", "Pizza", "Hawaiian Pizza", Dish, 3.0, Some(1), &[], "🍍",
        "Ham and pineapple - love it or hate it!"),
    dish!("pizza-6", "Pizza", "White Pizza", Dish, 3.0, Some(1), &["vegetarian"], "🧄",
        "No tomato sauce, just cheese, garlic, and herbs"),
    dish!("pizza-7", "Pizza", "Buffalo Chicken Pizza", Dish, 4.0, Some(3), &[], "🐔",
        "Spicy buffalo chicken with ranch dressing"),
    dish!("pizza-8", "Pizza", "Four Cheese Pizza", Dish, 3.0, Some(1), &["vegetarian"], "🧀",
        "Mozzarella, parmesan, ricotta, and gorgonzola"),
    dish!("bbq-1", "BBQ", "Pulled Pork", Dish, 5.0, Some(2), &[], "🐷",
        "Slow-smoked pork shoulder, tender and flavorful"),
    dish!("bbq-2", "BBQ", "Beef Brisket", Dish, 4.0, Some(2), &[], "🥩",
        "Low and slow smoked beef, melt-in-your-mouth tender"),
    dish!("bbq-3", "BBQ", "Ribs", Dish, 5.0, Some(2), &[], "🍖",
        "Fall-off-the-bone pork ribs with signature sauce"),
    dish!("bbq-4", "BBQ", "BBQ Chicken", Dish, 4.0, Some(2), &[], "🐔",
        "Smoky grilled chicken with tangy BBQ glaze"),
    dish!("bbq-5", "BBQ", "Burnt Ends", Dish, 3.0, Some(2), &[], "🔥",
        "Crispy, caramelized cubes of smoked brisket"),
    dish!("bbq-6", "BBQ", "Corn Bread", Dish, 4.0, Some(1), &["vegetarian"], "🌽",
        "Sweet, crumbly bread perfect with BBQ"),
    dish!("bbq-7", "BBQ", "Coleslaw", Dish, 3.0, Some(1), &["vegetarian"], "🥬",
        "Creamy cabbage salad, classic BBQ side"),
    dish!("bbq-8", "BBQ", "Smoked Sausage", Dish, 4.0, Some(3), &[], "🌭",
        "Spicy smoked sausage with perfect snap"),
    dish!("vegan-1", "Vegan", "Buddha Bowl", Dish, 4.0, Some(1), &["vegan", "gluten-free"], "🥗",
        "Colorful bowl with grains, vegetables, and tahini"),
    dish!("vegan-2", "Vegan", "Plant-Based Burger", Dish, 4.0, Some(1), &["vegan"], "🍔",
        "Impossible or Beyond burger with vegan toppings"),
    dish!("vegan-3", "Vegan", "Chickpea Curry", Dish, 4.0, Some(3), &["vegan", "gluten-free"], "🍛",
        "Spicy curry with coconut milk and vegetables"),
    dish!("vegan-4", "Vegan", "Quinoa Salad", Dish, 3.0, Some(1), &["vegan", "gluten-free"], "🥗",
        "Protein-rich grain salad with fresh herbs"),
    dish!("vegan-5", "Vegan", "Vegan Tacos", Dish, 4.0, Some(2), &["vegan"], "🌮",
        "Plant-based protein with fresh salsas"),
    dish!("vegan-6", "Vegan", "Smoothie Bowl", Dish, 4.0, Some(1), &["vegan"], "🥣",
        "Thick smoothie topped with fruits and granola"),
    dish!("vegan-7", "Vegan", "Mushroom Risotto", Dish, 3.0, Some(1), &["vegan"], "🍄",
        "Creamy rice dish with wild mushrooms (dairy-free)"),
    dish!("vegan-8", "Vegan", "Chia Pudding", Dish, 3.0, Some(1), &["vegan", "gluten-free"], "🥥",
        "Nutritious dessert with chia seeds and fruits"),
    dish!("seafood-1", "Seafood", "Grilled Salmon", Dish, 5.0, Some(1), &[], "🐟",
        "Fresh Atlantic salmon with lemon and herbs"),
    dish!("seafood-2", "Seafood", "Fish & Chips", Dish, 4.0, Some(1), &[], "🍟",
        "Beer-battered fish with crispy fries"),
    dish!("seafood-3", "Seafood", "Lobster Roll", Dish, 4.0, Some(1), &[], "🦞",
        "Fresh lobster meat in a buttered roll"),
    dish!("seafood-4", "Seafood", "Shrimp Scampi", Dish, 4.0, Some(2), &[], "🍤",
        "Garlic butter shrimp over pasta"),
    dish!("seafood-5", "Seafood", "Clam Chowder", Dish, 4.0, Some(1), &[], "🍲",
        "Creamy soup with clams and potatoes"),
    dish!("seafood-6", "Seafood", "Crab Cakes", Dish, 4.0, Some(1), &[], "🦀",
        "Pan-fried cakes with jumbo lump crab meat"),
    dish!("seafood-7", "Seafood", "Seared Tuna", Dish, 3.0, Some(2), &[], "🍣",
        "Perfectly seared tuna with wasabi"),
    dish!("seafood-8", "Seafood", "Seafood Paella", Dish, 3.0, Some(2), &[], "🥘",
        "Spanish rice dish with mixed seafood"),
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn default_cuisines() -> Vec<String> {
    DEFAULT_CUISINES.iter().map(|c| c.to_string()).collect()
}

/// Whether the dish catalog knows `cuisine`. Exact match.
pub fn is_known_cuisine(cuisine: &str) -> bool {
    DISHES.iter().any(|d| d.cuisine == cuisine)
}

/// Dish options for `cuisine` in catalog order, each popularity nudged by
/// up to ±0.25 and clamped to 1–5. Empty for an unknown cuisine.
pub fn dish_options(cuisine: &str, rng: &mut dyn RandomSource) -> Vec<DishOption> {
    DISHES
        .iter()
        .filter(|d| d.cuisine == cuisine)
        .map(|d| {
            let mut option = d.to_option();
            option.popularity = (d.popularity + (rng.next_f64() - 0.5) * POPULARITY_JITTER)
                .clamp(MIN_POPULARITY, MAX_POPULARITY);
            option
        })
        .collect()
}

/// Up to `count` dish options, favouring popular ones with some noise.
///
/// Every option gets one ranking key, `popularity + noise`, drawn up front;
/// options are then sorted by key, highest first.
pub fn random_dish_options(
    cuisine: &str,
    count: usize,
    rng: &mut dyn RandomSource,
) -> Vec<DishOption> {
    let mut ranked: Vec<(f64, DishOption)> = dish_options(cuisine, rng)
        .into_iter()
        .map(|option| {
            let key = option.popularity + (rng.next_f64() - 0.5) * RANKING_NOISE;
            (key, option)
        })
        .collect();

    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    ranked.into_iter().take(count).map(|(_, option)| option).collect()
}

/// Segment id and label for a cuisine.
pub fn describe_cuisine(cuisine: &String) -> (String, String) {
    (cuisine.to_lowercase(), cuisine.clone())
}

/// Segment id and label for a dish.
pub fn describe_dish(dish: &DishOption) -> (String, String) {
    (dish.id.clone(), format!("{} {}", dish.emoji, dish.name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
