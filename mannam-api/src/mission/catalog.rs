//! Fixed allow-lists for mission generation. Every mission field (place,
//! props, identifying actions) must come from here, whether it was drawn
//! randomly or suggested by the AI assistant. Missions only ever point at
//! public, open venues.

pub const PLACE_CATEGORIES: [&str; 7] = [
    "cafe",
    "bookstore",
    "park",
    "museum",
    "library",
    "mall",
    "restaurant",
];

/// Representative venues per category, also embedded in the AI prompt.
/// The first entry doubles as the fallback when the AI names an unknown venue.
pub fn place_examples(category: &str) -> Option<&'static [&'static str]> {
    Some(match category {
        "cafe" => &["Starbucks", "A Twosome Place", "Ediya Coffee", "Hollys Coffee"],
        "bookstore" => &["Kyobo Book Centre", "Youngpoong Books", "Aladin Books"],
        "park" => &[
            "Yeouido Hangang Park",
            "Olympic Park",
            "Seoul Forest",
            "Namsan Park",
        ],
        "museum" => &[
            "National Museum of Modern Art",
            "Seoul Museum of Art",
            "National Museum of Korea",
        ],
        "library" => &[
            "National Library of Korea",
            "Seoul Metropolitan Library",
            "District Public Library",
        ],
        "mall" => &["COEX food court", "Times Square food court", "IFC Mall food court"],
        "restaurant" => &["VIPS", "Outback Steakhouse", "Ashley Queens"],
        _ => return None,
    })
}

pub const PROP_CATEGORIES: [&str; 5] = [
    "clothing_color",
    "phone_screen",
    "convenience_item",
    "accessory",
    "book_magazine",
];

pub fn prop_options(category: &str) -> Option<&'static [&'static str]> {
    Some(match category {
        "clothing_color" => &[
            "red top",
            "blue top",
            "yellow top",
            "green top",
            "white top",
            "black top",
            "blue cap",
            "red cap",
            "white sneakers",
        ],
        "phone_screen" => &[
            "yellow wallpaper",
            "heart emoji wallpaper",
            "star emoji wallpaper",
            "blue wallpaper",
            "green wallpaper",
        ],
        "convenience_item" => &[
            "banana milk",
            "strawberry milk",
            "blue sports drink",
            "green umbrella",
            "red umbrella",
            "yellow plastic bag",
        ],
        "accessory" => &[
            "wristwatch",
            "eco bag",
            "sunglasses",
            "scarf",
            "baseball cap",
            "beanie",
        ],
        "book_magazine" => &[
            "any book",
            "today's newspaper",
            "book with a yellow cover",
            "book with a blue cover",
        ],
        _ => return None,
    })
}

pub const IDENTIFICATION_ACTIONS: [&str; 12] = [
    "Standing with weight on one leg",
    "Leaning against a wall with arms crossed",
    "Hiding a single rose behind your back",
    "Pretending to read an open book",
    "Wearing only one earphone",
    "Tapping the table with your fingers",
    "Resting your chin in your hand, gazing out the window",
    "Sitting with both hands cupping your chin",
    "Holding your phone upright and looking at it",
    "Tilting your head slightly and smiling",
    "Repeatedly checking your wristwatch",
    "Sitting while swinging both feet",
];

pub fn is_place_category(category: &str) -> bool {
    PLACE_CATEGORIES.contains(&category)
}

pub fn is_allowed_place(category: &str, name: &str) -> bool {
    place_examples(category).is_some_and(|names| names.contains(&name))
}

pub fn is_prop_category(category: &str) -> bool {
    PROP_CATEGORIES.contains(&category)
}

pub fn is_allowed_prop(category: &str, name: &str) -> bool {
    prop_options(category).is_some_and(|names| names.contains(&name))
}

pub fn is_allowed_action(action: &str) -> bool {
    IDENTIFICATION_ACTIONS.contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_examples() {
        for category in PLACE_CATEGORIES {
            assert!(!place_examples(category).unwrap().is_empty());
        }
        for category in PROP_CATEGORIES {
            assert!(!prop_options(category).unwrap().is_empty());
        }
    }

    #[test]
    fn unknown_categories_have_no_options() {
        assert!(place_examples("rooftop_bar").is_none());
        assert!(prop_options("tattoo").is_none());
    }

    #[test]
    fn membership_checks() {
        assert!(is_allowed_place("cafe", "Starbucks"));
        assert!(!is_allowed_place("cafe", "My Apartment"));
        assert!(is_allowed_prop("accessory", "eco bag"));
        assert!(!is_allowed_prop("accessory", "banana milk"));
        assert!(is_allowed_action(IDENTIFICATION_ACTIONS[3]));
        assert!(!is_allowed_action("Waving a flag"));
    }
}
