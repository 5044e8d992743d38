//! XML rendering of a converted record set
//!
//! Document shape:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <nexgen_audio_export>
//!   <audio>
//!     <type>Song</type>
//!     <status>Playing</status>
//!     <played_time>14:03:27</played_time>
//!     <length_in_seconds>449</length_in_seconds>
//!     <title>Blue Monday</title>
//!     <artist>New Order</artist>
//!     <category>Gold</category>
//!   </audio>
//! </nexgen_audio_export>
//! ```

use crate::error::ConvertError;
use playlog_common::PlayoutRecord;
use quick_xml::se::Serializer;
use serde::Serialize;

/// Root element of an export document
pub const EXPORT_ROOT: &str = "nexgen_audio_export";

/// Extension given to export documents
pub const EXPORT_EXTENSION: &str = "xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

#[derive(Serialize)]
struct AudioExport<'a> {
    audio: &'a [PlayoutRecord],
}

/// Render the full document in memory
pub fn render_export(records: &[PlayoutRecord]) -> Result<String, ConvertError> {
    let mut document = String::with_capacity(64 + records.len() * 256);
    document.push_str(XML_DECLARATION);
    document.push('\n');

    let mut serializer = Serializer::with_root(&mut document, Some(EXPORT_ROOT))
        .map_err(|e| ConvertError::Serialize(e.to_string()))?;
    serializer.indent(' ', 2);

    AudioExport { audio: records }
        .serialize(serializer)
        .map_err(|e| ConvertError::Serialize(e.to_string()))?;

    document.push('\n');
    Ok(document)
}
