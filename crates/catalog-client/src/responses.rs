use crate::error::CatalogError;
use core_types::Product;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Fields collected for one `Item` element while walking the response.
#[derive(Debug, Default)]
struct ItemFields {
    title: Option<String>,
    detail_url: Option<String>,
    image_url: Option<String>,
    rating: Option<f64>,
    price: Option<f64>,
}

impl ItemFields {
    /// A record is only emitted when both required fields are present.
    /// Rating and price default to 0.0 when the upstream node is absent.
    fn into_product(self) -> Option<Product> {
        Some(Product {
            name: self.title?,
            affiliate_link: self.detail_url?,
            image_url: self.image_url.unwrap_or_default(),
            rating: self.rating.unwrap_or(0.0),
            price: self.price.unwrap_or(0.0),
        })
    }

    fn record(&mut self, stack: &[String], text: String) {
        let Some(leaf) = stack.last() else {
            return;
        };
        match leaf.as_str() {
            // First occurrence wins; deeper duplicates are ignored.
            "Title" if self.title.is_none() => self.title = Some(text),
            "DetailPageURL" if self.detail_url.is_none() => self.detail_url = Some(text),
            "URL" if self.image_url.is_none() && stack.iter().any(|n| n == "LargeImage") => {
                self.image_url = Some(text)
            }
            "Rating" if self.rating.is_none() => self.rating = text.parse().ok(),
            // The catalog reports the lowest new price in minor currency units.
            "Amount" if self.price.is_none() && stack.iter().any(|n| n == "LowestNewPrice") => {
                self.price = text.parse::<f64>().ok().map(|cents| cents / 100.0)
            }
            _ => {}
        }
    }
}

/// Extracts product records from a catalog response body.
///
/// Items missing a title or detail-page URL are skipped silently; a body
/// that is not well-formed XML fails the whole operation.
pub fn parse_items(body: &str) -> Result<Vec<Product>, CatalogError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<ItemFields> = None;
    let mut products = Vec::new();

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(CatalogError::Unavailable(format!(
                    "malformed catalog response: {e}"
                )))
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "Item" && current.is_none() {
                    current = Some(ItemFields::default());
                }
                stack.push(name);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.pop();
                if name == "Item" {
                    if let Some(fields) = current.take() {
                        match fields.into_product() {
                            Some(product) => products.push(product),
                            None => {
                                tracing::debug!("skipping catalog item without title or detail URL")
                            }
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(fields) = current.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| {
                            CatalogError::Unavailable(format!("malformed catalog response: {e}"))
                        })?
                        .into_owned();
                    fields.record(&stack, text);
                }
            }
            Ok(_) => {}
        }
    }

    Ok(products)
}
