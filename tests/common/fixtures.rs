//! Sample documents shared by the integration tests

pub const DEFS_RAW: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Defs>
  <ThingDef Name="WallBase" Abstract="True"><category>Building</category></ThingDef>
  <ThingDef ParentName="WallBase"><defName>Wall</defName><label>wall</label></ThingDef>
  <ThingDef ParentName="WallBase"><defName>Door</defName><label>door</label></ThingDef>
</Defs>"#;

pub const DEFS_PATCHED: &str = r#"<Defs>
  <ThingDef ParentName="WallBase"><defName>Wall</defName><label>stone wall</label></ThingDef>
</Defs>"#;

/// `<Defs>` with `count` `<Item>Item i</Item>` children, i from 1
pub fn numbered_defs(count: usize) -> String {
    let mut xml = String::from("<Defs>");
    for i in 1..=count {
        xml.push_str(&format!("<Item>Item {i}</Item>"));
    }
    xml.push_str("</Defs>");
    xml
}

/// A document whose second line is `width` columns of attribute value
pub fn wide_defs(width: usize) -> String {
    format!(r#"<Defs><Item Description="{}" /></Defs>"#, "x".repeat(width))
}
