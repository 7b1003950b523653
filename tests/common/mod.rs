#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine};

/// Pixels on a run-length canvas.
pub const PIXELS: usize = 1872 * 1404;

/// Black pixels drawn at the start of the sample main layer.
pub const MAIN_STROKE: usize = 100;

pub const FAMILY_B_SIGNATURE: &str = "noteSN_FILE_VER_20220013";
pub const FAMILY_A_SIGNATURE: &str = "SN_FILE_ASA_20190529";

/// Assembles a container in memory, block by block.
pub struct ContainerBuilder {
    bytes: Vec<u8>,
}

impl ContainerBuilder {
    pub fn new(signature: &str) -> Self {
        Self {
            bytes: signature.as_bytes().to_vec(),
        }
    }

    /// Appends a length-prefixed block and returns its address.
    pub fn block(&mut self, content: &[u8]) -> u32 {
        let address = self.bytes.len() as u32;
        self.bytes
            .extend_from_slice(&(content.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(content);
        address
    }

    /// Appends a `<KEY:VALUE>` metadata block and returns its address.
    pub fn metadata(&mut self, pairs: &[(&str, &str)]) -> u32 {
        let text: String = pairs
            .iter()
            .map(|(key, value)| format!("<{}:{}>", key, value))
            .collect();
        self.block(text.as_bytes())
    }

    /// Appends the footer address and returns the file bytes.
    pub fn finish(mut self, footer: u32) -> Vec<u8> {
        self.bytes.extend_from_slice(&footer.to_le_bytes());
        self.bytes
    }
}

/// Run-length pairs covering `pixels` pixels of `code`.
pub fn fill_runs(code: u8, pixels: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut left = pixels;
    while left >= 0x4000 {
        out.extend_from_slice(&[code, 0xff]);
        left -= 0x4000;
    }
    while left >= 128 {
        out.extend_from_slice(&[code, 0x7f]);
        left -= 128;
    }
    if left > 0 {
        out.extend_from_slice(&[code, (left - 1) as u8]);
    }
    out
}

/// One template link record with every field base64 encoded.
pub fn template_record(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| STANDARD.encode(field))
        .collect::<Vec<_>>()
        .join(",")
}

/// A two-page layered note with titles, a keyword, a link, a cover and
/// template links on the first page.
pub fn sample_note() -> Vec<u8> {
    sample_note_with("N6", "RATTA_RLE")
}

pub fn sample_note_with(equipment: &str, layer_protocol: &str) -> Vec<u8> {
    let mut b = ContainerBuilder::new(FAMILY_B_SIGNATURE);

    let cover = b.block(b"cover-bitmap");
    let title_bitmap = b.block(b"title-bitmap");
    let second_title_bitmap = b.block(b"second-title-bitmap");
    let keyword_bitmap = b.block(b"keyword-bitmap");
    let link_bitmap = b.block(b"link-bitmap");

    let mut main = vec![0x61, (MAIN_STROKE - 1) as u8];
    main.extend(fill_runs(0x62, PIXELS - MAIN_STROKE));
    let main_bitmap = b.block(&main);
    let background_bitmap = b.block(&fill_runs(0x65, PIXELS));

    let template_text = format!(
        "{}|{}|",
        template_record(&["1", "P1", "2", "10", "20", "30", "40", "0", "target.note"]),
        template_record(&["1", "P1", "1", "50", "60", "70", "80", "1", "other.note"]),
    );
    let template = b.block(template_text.as_bytes());

    let p1_main = b.metadata(&[
        ("LAYERTYPE", "NOTE"),
        ("LAYERPROTOCOL", layer_protocol),
        ("LAYERNAME", "MAINLAYER"),
        ("LAYERBITMAP", &main_bitmap.to_string()),
    ]);
    let p1_background = b.metadata(&[
        ("LAYERTYPE", "NOTE"),
        ("LAYERPROTOCOL", layer_protocol),
        ("LAYERNAME", "BGLAYER"),
        ("LAYERBITMAP", &background_bitmap.to_string()),
    ]);
    let p2_main = b.metadata(&[
        ("LAYERPROTOCOL", layer_protocol),
        ("LAYERNAME", "MAINLAYER"),
        ("LAYERBITMAP", "0"),
    ]);

    let page1 = b.metadata(&[
        ("PAGESTYLE", "style_white"),
        ("PAGESTYLEMD5", "0"),
        ("LAYERINFO", "{\"layerId\"#0}"),
        ("LAYERSEQ", "MAINLAYER,BGLAYER"),
        ("MAINLAYER", &p1_main.to_string()),
        ("LAYER1", "0"),
        ("LAYER2", "0"),
        ("LAYER3", "0"),
        ("BGLAYER", &p1_background.to_string()),
        ("TOTALPATH", "0"),
        ("PAGEID", "P1"),
        ("RECOGNSTATUS", "1"),
        ("EXTERNALLINKINFO", &template.to_string()),
    ]);
    let page2 = b.metadata(&[
        ("PAGESTYLE", "style_grid"),
        ("PAGESTYLEMD5", "abc123"),
        ("LAYERINFO", "none"),
        ("MAINLAYER", &p2_main.to_string()),
        ("LAYER1", "0"),
        ("LAYER2", "0"),
        ("LAYER3", "0"),
        ("BGLAYER", "0"),
        ("PAGEID", "P2"),
    ]);

    let title = b.metadata(&[
        ("TITLESEQNO", "0"),
        ("TITLERECTORI", "100,200,300,50"),
        ("TITLEBITMAP", &title_bitmap.to_string()),
    ]);
    let second_title = b.metadata(&[
        ("TITLESEQNO", "1"),
        ("TITLERECTORI", "100,400,300,50"),
        ("TITLEBITMAP", &second_title_bitmap.to_string()),
    ]);
    let keyword = b.metadata(&[
        ("KEYWORDPAGE", "2"),
        ("KEYWORDRECT", "10,20,30,40"),
        ("KEYWORDSITE", &keyword_bitmap.to_string()),
        ("KEYWORD", "hello"),
    ]);
    let link = b.metadata(&[
        ("LINKTYPE", "0"),
        ("LINKINOUT", "0"),
        ("LINKRECT", "5,6,7,8"),
        ("LINKTIMESTAMP", "20230101120000"),
        ("LINKFILE", "Note/target.note"),
        ("LINKFILEID", "none"),
        ("PAGEID", "P2"),
        ("LINKBITMAP", &link_bitmap.to_string()),
    ]);

    let header = b.metadata(&[
        ("MODULE_LABEL", "none"),
        ("FILE_TYPE", "NOTE"),
        ("APPLY_EQUIPMENT", equipment),
        ("FILE_ID", "F20230101"),
        ("FILE_RECOGN_TYPE", "1"),
        ("STYLEUSAGETYPE", "2"),
    ]);

    let footer = b.metadata(&[
        ("FILE_FEATURE", &header.to_string()),
        ("PAGE1", &page1.to_string()),
        ("PAGE2", &page2.to_string()),
        ("TITLE_00020000100", &title.to_string()),
        ("TITLE_00020000100", &second_title.to_string()),
        ("KEYWORD_0002", &keyword.to_string()),
        ("LINKO_00010000", &link.to_string()),
        ("COVER_1", &cover.to_string()),
    ]);

    b.finish(footer)
}

/// A two-page note of the first device generation.
pub fn family_a_note() -> Vec<u8> {
    let mut b = ContainerBuilder::new(FAMILY_A_SIGNATURE);
    let header = b.metadata(&[("FILE_TYPE", "NOTE"), ("APPLY_EQUIPMENT", "A5")]);
    let page1 = b.metadata(&[("PROTOCOL", "SN_ASA_COMPRESS"), ("PAGESTYLE", "style_white")]);
    let page2 = b.metadata(&[("PROTOCOL", "SN_ASA_COMPRESS"), ("PAGESTYLE", "style_grid")]);
    let footer = b.metadata(&[
        ("FILE_FEATURE", &header.to_string()),
        ("PAGE", &page1.to_string()),
        ("PAGE", &page2.to_string()),
        ("TITLE_00010000100", &page1.to_string()),
    ]);
    b.finish(footer)
}
