//! Codec for the `Adobe_AdditionalMetadata.xmp` blob: a 4-byte big-endian
//! length of the uncompressed text followed by a zlib stream.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::domain::ColorLabel;
use crate::error::{Error, Result};

const HEADER_LEN: usize = 4;

/// Compress `text` into a framed blob. Empty text has no blob at all.
pub fn encode(text: &str) -> Result<Option<Vec<u8>>> {
    if text.is_empty() {
        return Ok(None);
    }
    let len = u32::try_from(text.len()).map_err(|_| Error::BlobTooLarge(text.len()))?;

    let mut out = Vec::with_capacity(HEADER_LEN + text.len() / 2);
    out.extend_from_slice(&len.to_be_bytes());
    let mut encoder = ZlibEncoder::new(out, Compression::default());
    encoder.write_all(text.as_bytes())?;
    Ok(Some(encoder.finish()?))
}

/// Decompress a framed blob.
///
/// Inputs shorter than the header decode to the empty string. The header
/// value is never used for sizing; the zlib stream must reach its end marker.
pub fn decode(data: &[u8]) -> Result<String> {
    if data.len() < HEADER_LEN {
        return Ok(String::new());
    }
    let input = &data[HEADER_LEN..];

    let mut inflater = Decompress::new(true);
    let mut out: Vec<u8> = Vec::with_capacity(input.len().saturating_mul(4).max(64));
    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        let status = inflater
            .decompress_vec(&input[consumed..], &mut out, FlushDecompress::Finish)
            .map_err(|e| Error::MalformedBlob(e.to_string()))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let stalled =
                    inflater.total_in() as usize == consumed && inflater.total_out() == produced;
                if stalled && out.len() < out.capacity() {
                    return Err(Error::MalformedBlob(format!(
                        "zlib stream truncated after {} bytes",
                        input.len()
                    )));
                }
            }
        }
    }

    String::from_utf8(out).map_err(|e| Error::MalformedBlob(e.to_string()))
}

/// Read the length header without decompressing. `None` for short input.
pub fn declared_len(data: &[u8]) -> Option<u32> {
    let header: [u8; HEADER_LEN] = data.get(..HEADER_LEN)?.try_into().ok()?;
    Some(u32::from_be_bytes(header))
}

/// Minimal XMP packet carrying rating, label and original capture time.
pub fn generate_basic(
    rating: Option<u8>,
    color_label: Option<ColorLabel>,
    capture_time: Option<&str>,
) -> String {
    let mut attrs = String::new();
    if let Some(rating) = rating {
        attrs.push_str(&format!("   xmp:Rating=\"{rating}\"\n"));
    }
    if let Some(label) = color_label {
        attrs.push_str(&format!("   xmp:Label=\"{label}\"\n"));
    }
    if let Some(time) = capture_time.filter(|t| !t.is_empty()) {
        attrs.push_str(&format!("   exif:DateTimeOriginal=\"{time}\"\n"));
    }

    format!(
        r#"<x:xmpmeta xmlns:x="adobe:ns:meta/" x:xmptk="Adobe XMP Core 7.0-c000 1.000000, 0000/00/00-00:00:00">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about=""
   xmlns:xmp="http://ns.adobe.com/xap/1.0/"
   xmlns:exif="http://ns.adobe.com/exif/1.0/"
   xmlns:crs="http://ns.adobe.com/camera-raw-settings/1.0/"
{attrs}   crs:Version="15.0"
   crs:ProcessVersion="11.0">
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>"#
    )
}

/// Value of the first `key="value"` attribute in an XMP packet.
pub fn extract_value<'a>(xmp: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("{key}=\"");
    let start = xmp.find(&needle)? + needle.len();
    let len = xmp[start..].find('"')?;
    Some(&xmp[start..start + len])
}
