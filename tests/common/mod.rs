//! Shared on-disk corpus fixture for the integration tests.
//!
//! Layout mirrors a real corpus directory:
//!
//! - `bible`: Genesis (no content file), Daniel 12-13, John 1 and 3, Romans 8
//! - `bibel`: 1. Mose 1, Daniel 12 with chapter 13 split into Susanna, Johannes 1 and 3
//! - `latin`: Iohannes 1 only

#![allow(dead_code)]

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use tempfile::TempDir;

pub fn chapter(slug: &str, chapter: u32, verses: RangeInclusive<u32>, text: &str) -> String {
    let mut out = format!(r#"<section id="{slug}-ch-{chapter}"><h2>Chapter {chapter}</h2><p>"#);
    for v in verses {
        out.push_str(&format!(
            r#"<span class="verse" id="{slug}-{chapter}-{v}"><sup>{v}</sup>{text} {chapter}:{v}</span>"#
        ));
    }
    out.push_str("</p></section>\n");
    out
}

pub fn book(chapters: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <html xmlns=\"http://www.w3.org/1999/xhtml\"><body>\n{}</body></html>\n",
        chapters.concat()
    )
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Write the fixture corpus into a fresh temporary directory
pub fn corpus_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "canonical.json",
        r#"{
  "genesis": {"bible": "Genesis", "bibel": "1. Mose"},
  "daniel": {"bible": "Daniel", "bibel": "Daniel"},
  "john": {"bible": "John", "bibel": "Johannes", "latin": "Iohannes"},
  "romans": {"bible": "Romans"}
}"#,
    );
    write(
        root,
        "osis.json",
        r#"{
  "Dan": {"bible": "Daniel", "bibel": ["Daniel", "Susanna"]},
  "John": {"bible": "John", "bibel": "Johannes", "latin": "Iohannes"}
}"#,
    );

    // bible
    write(
        root,
        "bible/books.tsv",
        "order\tshort_name\tdisplay_name\tlocator\n\
         1\tGenesis\tThe First Book of Moses\tot/genesis.xhtml\n\
         27\tDaniel\t\tot/daniel.xhtml\n\
         43\tJohn\tThe Gospel According to John\tnt/john.xhtml\n\
         45\tRomans\t\tnt/romans.xhtml\n",
    );
    write(
        root,
        "bible/abbreviations.tsv",
        "short_name\tvariants\n\
         # English spellings\n\
         Genesis\tGen\tGn\n\
         Daniel\tDan\tDn\n\
         John\tJn\tJhn\n\
         Romans\tRom\tRo\n",
    );
    write(
        root,
        "bible/ot/daniel.xhtml",
        &book(&[
            chapter("daniel", 12, 1..=3, "Daniel"),
            chapter("daniel", 13, 1..=4, "Susanna"),
        ]),
    );
    write(
        root,
        "bible/nt/john.xhtml",
        &book(&[
            chapter("john", 1, 1..=5, "Word"),
            chapter("john", 3, 1..=18, "John"),
        ]),
    );
    write(
        root,
        "bible/nt/romans.xhtml",
        &book(&[chapter("romans", 8, 1..=4, "Romans")]),
    );

    // bibel
    write(
        root,
        "bibel/books.tsv",
        "order\tshort_name\tdisplay_name\tlocator\n\
         1\t1. Mose\tDas erste Buch Mose\tat/1mose.xhtml\n\
         27\tDaniel\t\tat/daniel.xhtml\n\
         28\tSusanna\tSusanna im Bade\tat/susanna.xhtml\n\
         43\tJohannes\tDas Evangelium nach Johannes\tnt/johannes.xhtml\n",
    );
    write(
        root,
        "bibel/abbreviations.tsv",
        "short_name\tvariants\n\
         1. Mose\t1 Mo\t1Mo\tGenesis\n\
         Daniel\tDan\n\
         Susanna\tSus\n\
         Johannes\tJoh\tJh\n",
    );
    write(
        root,
        "bibel/at/1mose.xhtml",
        &book(&[chapter("1-mose", 1, 1..=3, "Anfang")]),
    );
    write(
        root,
        "bibel/at/daniel.xhtml",
        &book(&[chapter("daniel", 12, 1..=3, "Daniel")]),
    );
    write(
        root,
        "bibel/at/susanna.xhtml",
        &book(&[chapter("susanna", 13, 1..=4, "Susanna")]),
    );
    write(
        root,
        "bibel/nt/johannes.xhtml",
        &book(&[
            chapter("johannes", 1, 1..=7, "Wort"),
            chapter("johannes", 3, 1..=18, "Johannes"),
        ]),
    );

    // latin
    write(
        root,
        "latin/books.tsv",
        "43\tIohannes\tEvangelium secundum Iohannem\tiohannes.xhtml\n",
    );
    write(root, "latin/abbreviations.tsv", "Iohannes\tIo\tIoh\n");
    write(
        root,
        "latin/iohannes.xhtml",
        &book(&[chapter("iohannes", 1, 1..=5, "Verbum")]),
    );

    dir
}
