//! Pull dam records out of bulletin pages.

use crate::dam::DamRecord;
use crate::date::{self, ObservationDate};
use crate::html::{attr, first_block_with_class, inner_text, open_tag, tag_blocks};
use crate::layout::{ColumnLayout, RawRecord};
use crate::observation::Observation;
use crate::reference::{LevelUnit, ReferenceData};
use crate::units::{normalize_levels, UnitSuffix};
use log::debug;

/// A bulletin entry from the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Link text, the bulletin's date label
    pub date: String,
    pub url: String,
}

/// Rows of one bulletin plus the date label that applies to all of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedPage {
    pub as_of: String,
    pub rows: Vec<RawRecord>,
}

/// The newest bulletin on the listing page: the first post title link.
pub fn extract_latest_link(listing_html: &str) -> Option<PageLink> {
    let title = first_block_with_class(listing_html, "h3", "elementor-post__title")
        .or_else(|| first_block_with_class(listing_html, "div", "elementor-post__title"))?;
    let anchor = tag_blocks(title, "a").into_iter().next()?;
    let url = attr(open_tag(anchor), "href")?;
    Some(PageLink {
        date: inner_text(anchor),
        url,
    })
}

/// Read the date heading and every data row of a bulletin page.
pub fn extract_dam_page(page_html: &str, layout: ColumnLayout) -> ExtractedPage {
    let as_of = first_block_with_class(page_html, "h1", "entry-title")
        .map(inner_text)
        .unwrap_or_default();
    let rows = tag_blocks(page_html, "tr")
        .into_iter()
        .skip(layout.header_rows())
        .filter_map(|tr| {
            let cells: Vec<String> = tag_blocks(tr, "td").into_iter().map(inner_text).collect();
            let raw = layout.apply(&cells);
            if raw.is_none() {
                debug!("skipping table row with {} cells", cells.len());
            }
            raw
        })
        .collect();
    ExtractedPage { as_of, rows }
}

/// How extracted rows are turned into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    pub unit_suffix: UnitSuffix,
}

impl RawRecord {
    /// Resolve the row against the reference data and build a record holding
    /// a single observation. Rows for dams that are not tracked give `None`.
    pub fn into_dam_record(
        self,
        as_of: &str,
        reference: &ReferenceData,
        options: ExtractOptions,
    ) -> Option<DamRecord> {
        let Some(known) = reference.resolve(&self.name) else {
            debug!("no reference entry for '{}', dropping row", self.name);
            return None;
        };
        let mut dam = DamRecord {
            id: self.id,
            name: known.name.clone(),
            official_name: self.name,
            mwl: self.mwl,
            frl: self.frl,
            live_storage_at_frl: self.live_storage_at_frl,
            rule_level: self.rule_level,
            blue_level: self.blue_level,
            orange_level: self.orange_level,
            red_level: self.red_level,
            latitude: known.latitude,
            longitude: known.longitude,
            data: vec![Observation {
                date: date::standardize(as_of),
                water_level: self.water_level,
                live_storage: self.live_storage,
                storage_percentage: self.storage_percentage,
                inflow: self.inflow,
                power_house_discharge: self.power_house_discharge,
                spillway_release: self.spillway_release,
                total_outflow: self.total_outflow,
                rainfall: self.rainfall,
            }],
        };
        if known.level_unit == LevelUnit::Feet {
            normalize_levels(&mut dam, options.unit_suffix);
        }
        Some(dam)
    }
}

impl ExtractedPage {
    /// Every tracked dam on the page, in table order. If the page heading
    /// carries no usable date, `fallback_date` labels the observations instead.
    pub fn into_dam_records(
        self,
        reference: &ReferenceData,
        options: ExtractOptions,
        fallback_date: Option<&str>,
    ) -> Vec<DamRecord> {
        let as_of = match fallback_date {
            Some(fallback) if ObservationDate::parse(&self.as_of).as_naive_date().is_none() => {
                fallback.to_string()
            }
            _ => self.as_of,
        };
        self.rows
            .into_iter()
            .filter_map(|row| row.into_dam_record(&as_of, reference, options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body>
<article class="elementor-post elementor-grid-item">
  <div class="elementor-post__text">
    <h3 class="elementor-post__title">
      <a href="https://dams.kseb.in/?p=5476">16.07.2025</a>
    </h3>
  </div>
</article>
<article class="elementor-post elementor-grid-item">
  <h3 class="elementor-post__title"><a href="https://dams.kseb.in/?p=5474">15.07.2025</a></h3>
</article>
</body></html>"#;

    /// A bulletin with two header rows, three dams, one untracked dam and a
    /// totals row.
    fn bulletin(date: &str, idukki_level: &str, idukki_frl: &str) -> String {
        let dam_row = |id: &str, name: &str, frl: &str, level: &str| {
            let cells = vec![
                id.to_string(),
                name.to_string(),
                "Idukki".to_string(),
                "2408.50".to_string(),
                frl.to_string(),
                "1459.50".to_string(),
                "1459.50".to_string(),
                "2380.00".to_string(),
                "2390.00".to_string(),
                "2396.00".to_string(),
                "2397.00".to_string(),
                level.to_string(),
                "705.30".to_string(),
                "48.32".to_string(),
                "x".to_string(),
                "y".to_string(),
                "5.12".to_string(),
                "4.60".to_string(),
                "0.00".to_string(),
                "4.60".to_string(),
                "12.4".to_string(),
                "-".to_string(),
            ];
            let tds: String = cells.iter().map(|c| format!("<td> {} </td>", c)).collect();
            format!("<tr>{}</tr>\n", tds)
        };
        let mut html = format!(
            "<html><body><h1 class=\"entry-title\">{}</h1><table>\n\
             <tr><th>Sl</th><th>Name</th></tr>\n\
             <tr><td>1</td><td>2</td><td>3</td></tr>\n",
            date
        );
        html.push_str(&dam_row("1", "IDUKKI", idukki_frl, idukki_level));
        html.push_str(&dam_row("2", "IDAMALAYAR", "169.00", "160.02"));
        html.push_str(&dam_row("3", "KUNDALA", "5758 ft", "5740 ft"));
        html.push_str(&dam_row("4", "MULLAPERIYAR", "142.00", "131.50"));
        html.push_str("<tr><td colspan=\"11\">Total</td><td>1200</td></tr>\n");
        html.push_str("</table></body></html>");
        html
    }

    #[test]
    fn test_extract_latest_link() {
        let link = extract_latest_link(LISTING).unwrap();
        assert_eq!(link.date, "16.07.2025");
        assert_eq!(link.url, "https://dams.kseb.in/?p=5476");
        assert!(extract_latest_link("<html></html>").is_none());
    }

    #[test]
    fn test_extract_dam_page() {
        let page = extract_dam_page(&bulletin("16.07.2025", "2360.10", "2403.00"), ColumnLayout::Kseb2025);
        assert_eq!(page.as_of, "16.07.2025");
        assert_eq!(page.rows.len(), 4);
        assert_eq!(page.rows[0].name, "IDUKKI");
        assert_eq!(page.rows[0].water_level, "2360.10");
        assert_eq!(page.rows[0].rainfall, "12.4");
    }

    #[test]
    fn test_unmapped_rows_are_dropped_and_feet_converted() {
        let reference = ReferenceData::embedded().unwrap();
        let page = extract_dam_page(&bulletin("16-07-2025", "2360.10", "2403.00"), ColumnLayout::Kseb2025);
        let dams = page.into_dam_records(&reference, ExtractOptions::default(), None);
        let names: Vec<&str> = dams.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Idukki", "Idamalayar", "Kundala"]);

        let idukki = &dams[0];
        assert_eq!(idukki.official_name, "IDUKKI");
        assert_eq!(idukki.data.len(), 1);
        assert_eq!(idukki.data[0].date, "16.07.2025");
        assert!(idukki.latitude.is_some());

        let kundala = &dams[2];
        assert_eq!(kundala.frl, "1755.04");
        assert_eq!(kundala.data[0].water_level, "1749.55");
    }

    #[test]
    fn test_fallback_date_when_heading_missing() {
        let reference = ReferenceData::embedded().unwrap();
        let page = extract_dam_page(&bulletin("", "2360.10", "2403.00"), ColumnLayout::Kseb2025);
        let dams = page.into_dam_records(&reference, ExtractOptions::default(), Some("03.06.2025"));
        assert_eq!(dams[0].data[0].date, "03.06.2025");
    }
}
