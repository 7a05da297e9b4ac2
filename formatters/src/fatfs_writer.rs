// Writes files into an image through the fatfs crate

use fatfs::{FileSystem, FsOptions};
use fatimg_core::{FatWriter, ImageError, ImageSession};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

pub struct FatfsWriter;

impl FatWriter for FatfsWriter {
    fn name(&self) -> &'static str {
        "fatfs"
    }

    fn open(&self, image: &Path) -> Result<Box<dyn ImageSession>, ImageError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(image)
            .map_err(|e| ImageError::WriterUnavailable(format!("cannot open {}: {}", image.display(), e)))?;
        let fs = FileSystem::new(file, FsOptions::new()).map_err(|e| {
            ImageError::WriterUnavailable(format!("{} is not a FAT volume: {}", image.display(), e))
        })?;
        debug!(
            "Opened {} ({:?}, label {:?})",
            image.display(),
            fs.fat_type(),
            fs.volume_label()
        );
        Ok(Box::new(FatfsSession { fs }))
    }
}

pub struct FatfsSession {
    fs: FileSystem<File>,
}

fn entry_name(path: &str) -> &str {
    path.trim_start_matches('/')
}

impl ImageSession for FatfsSession {
    fn write_file_into(&mut self, path: &str, data: &[u8]) -> io::Result<()> {
        let root = self.fs.root_dir();
        let mut file = root.create_file(entry_name(path))?;
        // create_file opens an existing entry as is
        file.truncate()?;
        file.write_all(data)?;
        file.flush()
    }

    fn read_file(&mut self, path: &str) -> io::Result<Vec<u8>> {
        let root = self.fs.root_dir();
        let mut file = root.open_file(entry_name(path))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    fn finish(self: Box<Self>) -> Result<(), ImageError> {
        let FatfsSession { fs } = *self;
        fs.unmount()?;
        Ok(())
    }
}
