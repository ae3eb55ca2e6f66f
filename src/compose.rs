//! Address/city text composition and the street-cleaning transformer.

/// Build a free-text address line from street and house number.
///
/// "Avenue Fonsny" + "20" gives "Avenue Fonsny, 20"; a missing part is simply
/// left out.
pub fn build_address(street_name: Option<&str>, house_number: Option<&str>) -> String {
    match (presence(street_name), presence(house_number)) {
        (Some(street), Some(number)) => format!("{street}, {number}"),
        (Some(street), None) => street.to_string(),
        (None, Some(number)) => number.to_string(),
        (None, None) => String::new(),
    }
}

/// Build a free-text city line from post code and post name.
pub fn build_city(post_code: Option<&str>, post_name: Option<&str>) -> String {
    match (presence(post_code), presence(post_name)) {
        (Some(code), Some(name)) => format!("{code} {name}"),
        (Some(code), None) => code.to_string(),
        (None, Some(name)) => name.to_string(),
        (None, None) => String::new(),
    }
}

/// Street spelling normalization used by the advanced cascade.
///
/// Collapses runs of whitespace and drops a trailing parenthesized suffix,
/// which BeSt street names sometimes carry ("Avenue Fonsny (SG)").
pub fn clean_street(street: &str) -> String {
    let without_suffix = match street.rfind('(') {
        Some(open) if street.ends_with(')') => &street[..open],
        _ => street,
    };

    without_suffix.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn presence(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
