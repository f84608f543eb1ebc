// Cartridge module - Reading the cartridge image into memory
//
// The image is opaque to the frame loop: it is read whole, handed to the
// engine, and released. The iNES header is peeked at only to log what was
// loaded; deciding whether the image is usable is the engine's job.

use crate::emulator::{AllocationTarget, Engine, PresenterError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Size of the iNES header
pub const INES_HEADER_SIZE: usize = 16;

/// iNES magic number ("NES" followed by MS-DOS EOF)
pub const INES_MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

/// Nametable mirroring declared by the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// Summary of an iNES header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct INesHeader {
    /// PRG-ROM size in 16KB units
    pub prg_rom_banks: u8,
    /// CHR-ROM size in 8KB units (0 means CHR-RAM)
    pub chr_rom_banks: u8,
    /// Mapper number
    pub mapper: u8,
    pub mirroring: Mirroring,
    /// Battery-backed PRG-RAM present
    pub battery: bool,
    /// Header uses the NES 2.0 extensions
    pub nes2: bool,
}

impl INesHeader {
    /// Parse the header at the start of an image
    ///
    /// # Returns
    /// `None` if the image is shorter than a header or lacks the magic number
    pub fn parse(data: &[u8]) -> Option<Self> {
        let header = data.get(..INES_HEADER_SIZE)?;
        if header[..4] != INES_MAGIC {
            return None;
        }

        let flags6 = header[6];
        let flags7 = header[7];

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Some(Self {
            prg_rom_banks: header[4],
            chr_rom_banks: header[5],
            mapper: (flags7 & 0xF0) | (flags6 >> 4),
            mirroring,
            battery: flags6 & 0x02 != 0,
            nes2: flags7 & 0x0C == 0x08,
        })
    }
}

impl std::fmt::Display for INesHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mapper {}, {}x16KB PRG, {}x8KB CHR, {:?} mirroring",
            self.mapper, self.prg_rom_banks, self.chr_rom_banks, self.mirroring
        )?;
        if self.battery {
            write!(f, ", battery")?;
        }
        if self.nes2 {
            write!(f, ", NES 2.0")?;
        }
        Ok(())
    }
}

/// Cartridge image read from storage
///
/// Owns the raw bytes until they are handed to the engine. Hand-off consumes
/// the image, so nothing can read it after release:
///
/// ```compile_fail
/// use nes_v5::cartridge::CartridgeImage;
/// use nes_v5::emulator::TestPatternEngine;
///
/// let image = CartridgeImage::from_bytes(b"NES\x1a".to_vec());
/// let mut engine = TestPatternEngine::new();
/// image.hand_off(&mut engine).unwrap();
/// let _ = image.len(); // image was moved into hand_off
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeImage {
    data: Vec<u8>,
}

impl CartridgeImage {
    /// Read a whole cartridge image
    ///
    /// The file is closed before this returns.
    ///
    /// # Errors
    /// * `PresenterError::Io` if the file cannot be opened or read
    /// * `PresenterError::Allocation` if there is no memory for the contents
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nes_v5::cartridge::CartridgeImage;
    ///
    /// let image = CartridgeImage::load("/usd/game.nes").expect("Failed to open game.nes");
    /// println!("{} bytes", image.len());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PresenterError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PresenterError::io(path, e))?;
        let size = file
            .metadata()
            .map_err(|e| PresenterError::io(path, e))?
            .len();

        Self::read_sized(path, file, size)
    }

    /// Read an image whose size is already known
    ///
    /// Reserves `size` bytes up front, then reads to the end of `source`.
    fn read_sized<R: Read>(
        path: &Path,
        mut source: R,
        size: u64,
    ) -> Result<Self, PresenterError> {
        let size = usize::try_from(size).unwrap_or(usize::MAX);

        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| AllocationTarget::GameData)?;
        source
            .read_to_end(&mut data)
            .map_err(|e| PresenterError::io(path, e))?;

        Ok(Self { data })
    }

    /// Wrap bytes already in memory
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Header summary, if the image carries an iNES header
    pub fn header(&self) -> Option<INesHeader> {
        INesHeader::parse(&self.data)
    }

    /// Give the image to the engine and release it
    ///
    /// The engine keeps its own copy. The image is dropped before this
    /// returns, whether or not the engine accepted it.
    ///
    /// # Errors
    /// `PresenterError::Load` if the engine rejects the image
    pub fn hand_off<E: Engine>(self, engine: &mut E) -> Result<(), PresenterError> {
        let accepted = engine.load(&self.data);
        drop(self);

        if accepted {
            Ok(())
        } else {
            Err(PresenterError::Load)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Color;
    use crate::input::InputState;

    fn ines_image(flags6: u8, flags7: u8) -> Vec<u8> {
        let mut data = vec![0u8; INES_HEADER_SIZE + 16 * 1024];
        data[..4].copy_from_slice(&INES_MAGIC);
        data[4] = 1;
        data[5] = 1;
        data[6] = flags6;
        data[7] = flags7;
        data
    }

    struct Picky {
        accept: bool,
        seen: usize,
    }

    impl Engine for Picky {
        fn load(&mut self, data: &[u8]) -> bool {
            self.seen = data.len();
            self.accept
        }

        fn set_input(&mut self, _input: &InputState) {}

        fn next_frame(&mut self) {}

        fn screen_buffer(&self) -> &[u8] {
            &[]
        }

        fn palette_color(_index: u8) -> Color {
            Color::default()
        }
    }

    #[test]
    fn test_parse_header() {
        let header = INesHeader::parse(&ines_image(0x13, 0x40)).unwrap();
        assert_eq!(header.prg_rom_banks, 1);
        assert_eq!(header.chr_rom_banks, 1);
        assert_eq!(header.mapper, 0x41);
        assert_eq!(header.mirroring, Mirroring::Vertical);
        assert!(header.battery);
        assert!(!header.nes2);
    }

    #[test]
    fn test_parse_four_screen_nes2() {
        let header = INesHeader::parse(&ines_image(0x08, 0x08)).unwrap();
        assert_eq!(header.mirroring, Mirroring::FourScreen);
        assert!(header.nes2);
    }

    #[test]
    fn test_parse_rejects_bad_magic_and_short_data() {
        let mut data = ines_image(0, 0);
        data[3] = 0;
        assert!(INesHeader::parse(&data).is_none());
        assert!(INesHeader::parse(&INES_MAGIC).is_none());
    }

    #[test]
    fn test_header_display() {
        let header = INesHeader::parse(&ines_image(0x02, 0x00)).unwrap();
        assert_eq!(
            header.to_string(),
            "mapper 0, 1x16KB PRG, 1x8KB CHR, Horizontal mirroring, battery"
        );
    }

    #[test]
    fn test_load_reads_whole_file() {
        let path = std::env::temp_dir().join(format!("nes_v5_cart_{}.nes", std::process::id()));
        std::fs::write(&path, ines_image(0, 0)).unwrap();

        let image = CartridgeImage::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(image.len(), INES_HEADER_SIZE + 16 * 1024);
        assert!(image.header().is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CartridgeImage::load("/nonexistent/dir/game.nes").unwrap_err();
        assert!(matches!(err, PresenterError::Io { .. }));
        assert_eq!(err.to_string(), "Failed to open game.nes");
    }

    #[test]
    fn test_oversized_image_reports_allocation_failure() {
        let err = CartridgeImage::read_sized(Path::new("/usd/game.nes"), std::io::empty(), u64::MAX)
            .unwrap_err();

        assert!(matches!(
            err,
            PresenterError::Allocation(AllocationTarget::GameData)
        ));
        assert_eq!(err.to_string(), "Failed to allocate memory for game data");
    }

    #[test]
    fn test_read_sized_reads_to_end() {
        let image =
            CartridgeImage::read_sized(Path::new("game.nes"), &[1u8, 2, 3, 4][..], 4).unwrap();
        assert_eq!(image.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_hand_off_passes_bytes() {
        let mut engine = Picky {
            accept: true,
            seen: 0,
        };
        CartridgeImage::from_bytes(vec![1, 2, 3])
            .hand_off(&mut engine)
            .unwrap();
        assert_eq!(engine.seen, 3);
    }

    #[test]
    fn test_hand_off_rejected() {
        let mut engine = Picky {
            accept: false,
            seen: 0,
        };
        let err = CartridgeImage::from_bytes(vec![0; 8])
            .hand_off(&mut engine)
            .unwrap_err();
        assert!(matches!(err, PresenterError::Load));
    }
}
