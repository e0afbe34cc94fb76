use anyhow::{anyhow, Result};
use bytes::Buf;

/// Checked variants of the big-endian getters on [`bytes::Buf`].
/// The plain getters panic when the buffer runs dry, which is never
/// acceptable when the bytes come from a file we do not control.
pub trait SafeBuf: Buf {
    fn try_get_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.get_u8())
    }

    fn try_get_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.get_i8())
    }

    fn try_get_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.get_u16())
    }

    fn try_get_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.get_i16())
    }

    fn try_get_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.get_u32())
    }

    fn try_get_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.get_u64())
    }

    fn try_get_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        Ok(self.get_f32())
    }

    fn try_get_f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        Ok(self.get_f64())
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(anyhow!(
                "unexpected end of stream: needed {} byte(s), {} remaining",
                needed,
                self.remaining()
            ));
        }

        Ok(())
    }
}

impl<T: Buf> SafeBuf for T {}

#[cfg(test)]
mod tests {
    use super::SafeBuf;
    use bytes::Bytes;

    #[test]
    fn it_reads_big_endian_values() {
        let mut bytes = Bytes::from_static(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x37]);

        assert_eq!(bytes.try_get_u32().unwrap(), 0xCAFE_BABE);
        assert_eq!(bytes.try_get_u16().unwrap(), 0x37);
    }

    #[test]
    fn it_fails_instead_of_panicking_on_short_buffers() {
        let mut bytes = Bytes::from_static(&[0x01]);

        assert!(bytes.try_get_u16().is_err());
        // the failed read must not consume anything
        assert_eq!(bytes.try_get_u8().unwrap(), 0x01);
    }

    #[test]
    fn it_sign_extends_signed_reads() {
        let mut bytes = Bytes::from_static(&[0xFF, 0xFF, 0xFF]);

        assert_eq!(bytes.try_get_i8().unwrap(), -1);
        assert_eq!(bytes.try_get_i16().unwrap(), -1);
    }
}
