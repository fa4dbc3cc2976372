pub const SIZE_U8: usize = 1;
pub const SIZE_U16: usize = 2;
pub const SIZE_U32: usize = 4;
pub const SIZE_U64: usize = 8;

pub struct LeSliceReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> LeSliceReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn has_bytes(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        let v = *self.buf.get(self.pos)?;
        self.pos += SIZE_U8;
        Some(v)
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        Some(u16::from_le_bytes(self.read_array::<SIZE_U16>()?))
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.read_array::<SIZE_U32>()?))
    }

    pub fn read_i32(&mut self) -> Option<i32> {
        Some(i32::from_le_bytes(self.read_array::<SIZE_U32>()?))
    }

    pub fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.read_array::<SIZE_U64>()?))
    }

    pub fn read_i64(&mut self) -> Option<i64> {
        Some(i64::from_le_bytes(self.read_array::<SIZE_U64>()?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        if !self.has_bytes(n) {
            return None;
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Some(out)
    }

    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.read_bytes(N)?.try_into().ok()
    }
}
