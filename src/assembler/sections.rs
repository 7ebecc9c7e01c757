/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! The three fixed ZX16 sections. Each is an append-only byte buffer with a
//! base address; there is no banking or nesting, unlike richer multi-section
//! formats — a single mutable cursor selects which buffer pass 1/pass 2 write
//! into.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionName {
    Text,
    Data,
    Bss,
}

impl SectionName {
    pub fn base_address(self) -> u16 {
        match self {
            SectionName::Text => 0x0020,
            SectionName::Data => 0x8000,
            SectionName::Bss => 0x9000,
        }
    }
}

#[derive(Debug, Default)]
pub struct Section {
    pub bytes: Vec<u8>,
}

pub struct Sections {
    pub text: Section,
    pub data: Section,
    pub bss: Section,
    pub current: SectionName,
    pub current_address: u16,
}

impl Sections {
    pub fn new() -> Self {
        Sections {
            text: Section::default(),
            data: Section::default(),
            bss: Section::default(),
            current: SectionName::Text,
            current_address: SectionName::Text.base_address(),
        }
    }

    pub fn switch(&mut self, name: SectionName) {
        self.current = name;
        self.current_address = name.base_address();
    }

    pub fn current_mut(&mut self) -> &mut Section {
        match self.current {
            SectionName::Text => &mut self.text,
            SectionName::Data => &mut self.data,
            SectionName::Bss => &mut self.bss,
        }
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.current_mut().bytes.push(byte);
        self.current_address = self.current_address.wrapping_add(1);
    }

    pub fn push_word_le(&mut self, word: u16) {
        self.push_byte((word & 0xFF) as u8);
        self.push_byte(((word >> 8) & 0xFF) as u8);
    }

    pub fn extend_zeros(&mut self, count: usize) {
        let section = self.current_mut();
        section.bytes.extend(std::iter::repeat(0u8).take(count));
        self.current_address = self.current_address.wrapping_add(count as u16);
    }
}
