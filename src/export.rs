use std::io::Write;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use crate::listing::Listing;

pub const HEADER: [&str; 4] = ["Title", "Company", "Location", "Link"];

/// Commas become spaces so the unquoted columns stay aligned.
fn flatten(field: &str) -> String {
    field.replace(',', " ")
}

/// Writes every listing as an unquoted `Title,Company,Location,Link` row.
pub fn write_csv<W: Write>(listings: &[Listing], out: W) -> csv::Result<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(HEADER)?;
    for listing in listings {
        writer.write_record([
            flatten(&listing.title),
            flatten(&listing.company),
            flatten(&listing.location),
            listing.link.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_bytes(listings: &[Listing]) -> csv::Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(listings, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{test_listing, SourceTag};

    #[test]
    fn test_commas_replaced_with_spaces() {
        let mut listing = test_listing("Foo, Bar", "Acme, Inc", SourceTag::Indeed);
        listing.location = "Remote, Mumbai".to_string();
        listing.link = "https://example.com/job1".to_string();

        let csv = String::from_utf8(to_csv_bytes(&[listing]).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Title,Company,Location,Link");
        assert_eq!(lines[1], "Foo  Bar,Acme  Inc,Remote  Mumbai,https://example.com/job1");
    }

    #[test]
    fn test_header_only_when_empty() {
        let csv = String::from_utf8(to_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(csv, "Title,Company,Location,Link\n");
    }

    #[test]
    fn test_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("internships.csv");
        let file = std::fs::File::create(&path).unwrap();
        let listings = vec![
            test_listing("A", "B", SourceTag::Indeed),
            test_listing("C", "D", SourceTag::LinkedIn),
        ];
        write_csv(&listings, file).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
