//! Mapping of trade statistics XML responses into records.
//!
//! Every `item` element, at any depth, is one record. Its direct children
//! are looked up by name; numeric children that are absent or empty
//! default to `0.0`.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use tracing::warn;
use tradeprice_core::{Error, Result, TradeRecord};

/// Tag of a record element.
pub const ITEM_TAG: &str = "item";

/// Child element names of an `item`.
pub mod field {
    pub const HS_CODE: &str = "hsCd";
    pub const PERIOD: &str = "year";
    pub const PAYMENTS_BALANCE: &str = "balPayments";
    pub const EXPORT_VALUE: &str = "expDlr";
    pub const EXPORT_WEIGHT: &str = "expWgt";
    pub const IMPORT_VALUE: &str = "impDlr";
    pub const IMPORT_WEIGHT: &str = "impWgt";
    pub const STATUS_CODE: &str = "statCd";
}

/// Child texts of one `item`, keyed by element name.
#[derive(Debug, Default)]
struct ItemFields(HashMap<String, String>);

impl ItemFields {
    fn text(&self, name: &str) -> String {
        self.0.get(name).map(|s| s.trim().to_string()).unwrap_or_default()
    }

    fn amount(&self, name: &str) -> Result<f64> {
        match self.0.get(name).map(|s| s.trim()) {
            None | Some("") => Ok(0.0),
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| Error::parse(format!("{name}: '{raw}' is not a number"))),
        }
    }

    fn into_record(self) -> Result<TradeRecord> {
        Ok(TradeRecord {
            hs_code: self.text(field::HS_CODE),
            period: self.text(field::PERIOD),
            payments_balance: self.amount(field::PAYMENTS_BALANCE)?,
            export_value_usd: self.amount(field::EXPORT_VALUE)?,
            export_weight_kg: self.amount(field::EXPORT_WEIGHT)?,
            import_value_usd: self.amount(field::IMPORT_VALUE)?,
            import_weight_kg: self.amount(field::IMPORT_WEIGHT)?,
            status_code: self.text(field::STATUS_CODE),
        })
    }
}

/// Parse every `item` element of a response document.
///
/// Items with unparsable numeric fields are logged and skipped. A document
/// that is not well-formed XML, has no root element, or ends before every
/// element is closed, is an error.
pub fn parse_items(xml: &str) -> Result<Vec<TradeRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut saw_element = false;
    // Elements opened and not yet closed, across the whole document.
    let mut open = 0usize;
    // Open item, the current direct child, and nesting depth inside the item.
    let mut item: Option<ItemFields> = None;
    let mut child: Option<String> = None;
    let mut depth = 0usize;
    // Set once the current child has a sub-element; later text is not its value.
    let mut child_done = false;

    loop {
        let event = reader.read_event().map_err(|e| Error::parse(e.to_string()))?;
        match event {
            Event::Start(e) => {
                saw_element = true;
                open += 1;
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if let Some(fields) = item.as_mut() {
                    depth += 1;
                    if depth == 1 {
                        fields.0.entry(name.clone()).or_default();
                        child = Some(name);
                        child_done = false;
                    } else {
                        child_done = true;
                    }
                } else if name == ITEM_TAG {
                    item = Some(ItemFields::default());
                    depth = 0;
                }
            }
            Event::Empty(e) => {
                saw_element = true;
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match item.as_mut() {
                    None if name == ITEM_TAG => push_item(&mut records, ItemFields::default()),
                    Some(fields) if depth == 0 => {
                        fields.0.entry(name).or_default();
                    }
                    Some(_) => child_done = true,
                    None => {}
                }
            }
            Event::Text(t) => {
                if let (Some(fields), Some(name), 1, false) =
                    (item.as_mut(), child.as_ref(), depth, child_done)
                {
                    let text = t.unescape().map_err(|e| Error::parse(e.to_string()))?;
                    fields.0.entry(name.clone()).or_default().push_str(&text);
                }
            }
            Event::CData(c) => {
                if let (Some(fields), Some(name), 1, false) =
                    (item.as_mut(), child.as_ref(), depth, child_done)
                {
                    let text = String::from_utf8_lossy(&c).into_owned();
                    fields.0.entry(name.clone()).or_default().push_str(&text);
                }
            }
            Event::End(_) => {
                open = open.saturating_sub(1);
                if item.is_some() {
                    if depth == 0 {
                        if let Some(fields) = item.take() {
                            push_item(&mut records, fields);
                        }
                    } else {
                        depth -= 1;
                        if depth == 0 {
                            child = None;
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_element {
        return Err(Error::parse("response has no root element"));
    }
    if open > 0 {
        return Err(Error::parse(format!("truncated response: {open} unclosed element(s)")));
    }
    Ok(records)
}

fn push_item(records: &mut Vec<TradeRecord>, fields: ItemFields) {
    match fields.into_record() {
        Ok(record) => records.push(record),
        Err(e) => warn!("Skipping unparsable item: {}", e),
    }
}
