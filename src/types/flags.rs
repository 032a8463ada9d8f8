/*
    DvFox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/types/flags.rs

    Defines common bitflags
*/

use bitflags::bitflags;

bitflags! {
    /// Tag ID bits found in the first ID byte of most subcode sync blocks.
    /// These bits are active low on tape: a cleared bit marks the frame.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[rustfmt::skip]
    pub struct SubcodeTag: u8 {
        #[doc = "First half ID: set for the first half of the DIF sequences in a channel"]
        const FIRST_HALF    = 0b1000_0000;
        #[doc = "Index marker, a location of interest marked by the user"]
        const INDEX         = 0b0100_0000;
        #[doc = "Skip marker, the start of a range of frames to skip over"]
        const SKIP          = 0b0010_0000;
        #[doc = "Photo picture marker, a frame tagged as a still picture"]
        const PICTURE       = 0b0001_0000;
    }
}

impl SubcodeTag {
    /// Build the active-low tag bits for the given mark states. An absent value is written as
    /// unmarked.
    pub fn from_marks(index: Option<bool>, skip: Option<bool>, picture: Option<bool>) -> SubcodeTag {
        let mut tag = SubcodeTag::empty();
        tag.set(SubcodeTag::INDEX, index != Some(true));
        tag.set(SubcodeTag::SKIP, skip != Some(true));
        tag.set(SubcodeTag::PICTURE, picture != Some(true));
        tag
    }

    pub fn index_marked(&self) -> bool {
        !self.contains(SubcodeTag::INDEX)
    }

    pub fn skip_marked(&self) -> bool {
        !self.contains(SubcodeTag::SKIP)
    }

    pub fn picture_marked(&self) -> bool {
        !self.contains(SubcodeTag::PICTURE)
    }
}
