use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::session::Session;

/// Sector names mapped to their opaque identifiers, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorCatalog {
    entries: Vec<(String, String)>,
}

impl SectorCatalog {
    /// A repeated name keeps its first position and takes the latest id.
    pub fn insert(&mut self, name: String, id: String) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = id,
            None => self.entries.push((name, id)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, id)| (n.as_str(), id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, I: Into<String>> FromIterator<(N, I)> for SectorCatalog {
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut catalog = SectorCatalog::default();
        for (name, id) in iter {
            catalog.insert(name.into(), id.into());
        }
        catalog
    }
}

/// A way of spotting sectors in a page. Returns `None` when the markup
/// shape it looks for is absent or yields nothing.
pub type Strategy = fn(&Html) -> Option<SectorCatalog>;

/// Tried in order; the first non-empty catalog wins.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("select[name=setor]", from_select),
    ("div.setor-item", from_items),
];

/// `<select name="setor">` options: text -> value.
fn from_select(doc: &Html) -> Option<SectorCatalog> {
    let select_sel = Selector::parse(r#"select[name="setor"]"#).ok()?;
    let option_sel = Selector::parse("option").ok()?;

    let select = doc.select(&select_sel).next()?;
    let catalog: SectorCatalog = select
        .select(&option_sel)
        .map(|opt| {
            let name = element_text(&opt);
            // HTML semantics: an option without `value` submits its text
            let id = opt.value().attr("value").map_or_else(|| name.clone(), str::to_string);
            (name, id)
        })
        .collect();
    (!catalog.is_empty()).then_some(catalog)
}

/// `<div class="setor-item" data-setor-id="..">` elements: text -> id.
fn from_items(doc: &Html) -> Option<SectorCatalog> {
    let item_sel = Selector::parse("div.setor-item").ok()?;

    let catalog: SectorCatalog = doc
        .select(&item_sel)
        .filter_map(|div| {
            let id = div.value().attr("data-setor-id")?;
            Some((element_text(&div), id.to_string()))
        })
        .collect();
    (!catalog.is_empty()).then_some(catalog)
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Run the strategies against already-fetched markup.
pub fn parse_sectors(html: &str) -> Option<SectorCatalog> {
    let doc = Html::parse_document(html);
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(&doc)?;
        info!("Found {} sectors via {}", found.len(), name);
        Some(found)
    })
}

/// Fetch `url` and look for sectors. Any failure reads as "none found".
pub fn discover(session: &Session, url: &str) -> Option<SectorCatalog> {
    let html = match session.get_text(url, session.settings().request_timeout()) {
        Ok(html) => html,
        Err(e) => {
            warn!("Could not load sectors page {}: {}", url, e);
            return None;
        }
    };
    let catalog = parse_sectors(&html);
    if catalog.is_none() {
        info!("No sectors found at {}", url);
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn select_options_become_catalog() {
        let catalog = parse_sectors(&fixture("sectors_select")).unwrap();
        let pairs: Vec<_> = catalog.iter().collect();
        assert_eq!(pairs, vec![("Sales", "1"), ("Support", "2")]);
    }

    #[test]
    fn items_used_when_no_select() {
        let catalog = parse_sectors(&fixture("sectors_items")).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("Financeiro"), Some("fin-01"));
        assert_eq!(catalog.get("Recursos Humanos"), Some("rh-02"));
        assert_eq!(catalog.get("Sem id"), None);
    }

    #[test]
    fn select_wins_over_items() {
        let html = r#"<select name="setor"><option value="9">Ops</option></select>
                      <div class="setor-item" data-setor-id="1">Other</div>"#;
        let catalog = parse_sectors(html).unwrap();
        assert_eq!(catalog.iter().collect::<Vec<_>>(), vec![("Ops", "9")]);
    }

    #[test]
    fn empty_select_falls_through() {
        let html = r#"<select name="setor"></select>
                      <div class="setor-item" data-setor-id="5">Legal</div>"#;
        let catalog = parse_sectors(html).unwrap();
        assert_eq!(catalog.get("Legal"), Some("5"));
    }

    #[test]
    fn option_without_value_uses_text() {
        let html = r#"<select name="setor"><option> Compras </option></select>"#;
        let catalog = parse_sectors(html).unwrap();
        assert_eq!(catalog.get("Compras"), Some("Compras"));
    }

    #[test]
    fn unrelated_page_has_no_sectors() {
        let html = r#"<form><select name="lang"><option value="pt">PT</option></select></form>"#;
        assert!(parse_sectors(html).is_none());
        assert!(parse_sectors("").is_none());
    }

    #[test]
    fn duplicate_names_keep_order() {
        let catalog: SectorCatalog = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        assert_eq!(catalog.iter().collect::<Vec<_>>(), vec![("A", "3"), ("B", "2")]);
    }
}
