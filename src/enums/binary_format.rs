use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryFormat {
    Elf,
    Pe,
    MachO,
    MachOUniversal,
    Unknown,
}

const ELF_MAGIC: &[u8] = b"\x7fELF";
const MZ_MAGIC: &[u8] = b"MZ";
const MACH_O_MAGICS: &[&[u8]] = &[
    b"\xfe\xed\xfa\xce",
    b"\xfe\xed\xfa\xcf",
    b"\xce\xfa\xed\xfe",
    b"\xcf\xfa\xed\xfe",
];
const UNIVERSAL_MAGIC: &[u8] = b"\xca\xfe\xba\xbe";

impl BinaryFormat {
    /// Guess the container format from leading magic bytes.
    pub fn sniff(payload: &[u8]) -> Self {
        if payload.starts_with(ELF_MAGIC) {
            BinaryFormat::Elf
        } else if payload.starts_with(MZ_MAGIC) {
            BinaryFormat::Pe
        } else if MACH_O_MAGICS.iter().any(|magic| payload.starts_with(magic)) {
            BinaryFormat::MachO
        } else if payload.starts_with(UNIVERSAL_MAGIC) {
            BinaryFormat::MachOUniversal
        } else {
            BinaryFormat::Unknown
        }
    }
}
