//! The bundled recipe corpus.

use recipe_search_core::models::Document;

const RECIPES: &[(&str, &str, &str)] = &[
    (
        "vanilla-ice-cream",
        "Vanilla Ice Cream",
        "Whisk egg yolks with sugar, temper with warm milk and heavy cream infused with a split \
         vanilla bean, cook to a custard, chill overnight, then churn in an ice cream maker \
         until thick and freeze until scoopable.",
    ),
    (
        "tomato-soup",
        "Tomato Soup",
        "Soften onion and garlic in olive oil, add canned plum tomatoes, vegetable stock and a \
         pinch of sugar, simmer for twenty minutes, then blend until smooth and season with salt, \
         pepper and fresh basil.",
    ),
    (
        "grilled-cheese",
        "Grilled Cheese",
        "Butter two slices of sourdough on the outside, layer sharp cheddar between them and \
         cook in a skillet over medium heat, pressing gently, until both sides are golden and \
         the cheese has melted.",
    ),
    (
        "chocolate-chip-cookies",
        "Chocolate Chip Cookies",
        "Cream softened butter with brown and white sugar, beat in eggs and vanilla, fold in \
         flour, baking soda and salt, stir through chocolate chips, scoop onto a tray and bake \
         at 180C for eleven minutes.",
    ),
    (
        "guacamole",
        "Guacamole",
        "Mash ripe avocados with lime juice and salt, then fold in finely diced red onion, \
         jalapeno, tomato and chopped coriander. Serve straight away with tortilla chips.",
    ),
    (
        "banana-split",
        "Banana Split",
        "Halve a banana lengthwise, add three scoops of ice cream, top with chocolate sauce, \
         strawberry sauce and crushed pineapple, then finish with whipped cream, nuts and a \
         cherry.",
    ),
];

/// Every bundled recipe, in indexing order.
pub fn recipes() -> Vec<Document> {
    RECIPES
        .iter()
        .map(|(id, title, content)| Document::new(*id, *title, *content))
        .collect()
}

/// Print the bundled corpus.
pub fn list_recipes() {
    for doc in recipes() {
        println!("{}  {}", doc.id, doc.title);
    }
}
