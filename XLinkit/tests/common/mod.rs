//! Builder for synthetic XLNK files
//!
//! Layout written by [`XLinkBuilder::build`]:
//! header, user data table, param define table, asset param blocks,
//! trigger param blocks, local property name refs, direct values,
//! conditions, user data headers, name table.

#![allow(dead_code)]

use byteorder::{ByteOrder, WriteBytesExt};
use std::collections::HashMap;
use std::marker::PhantomData;
use xlinkit::formats::common::hash_name;
use xlinkit::formats::xlink::HeaderVariant;

pub const NO_OFFSET: u32 = u32::MAX;

/// Reference word pointing at a direct value slot.
pub fn direct_ref(index: u32) -> u32 {
    index
}

/// Reference word pointing at a name table string.
pub fn string_ref(offset: u32) -> u32 {
    0x0100_0000 | offset
}

pub struct Buf<E> {
    pub data: Vec<u8>,
    order: PhantomData<E>,
}

impl<E: ByteOrder> Buf<E> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            order: PhantomData,
        }
    }

    pub fn len(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn u8(&mut self, v: u8) {
        self.data.push(v);
    }

    pub fn u16(&mut self, v: u16) {
        self.data.write_u16::<E>(v).unwrap();
    }

    pub fn i16(&mut self, v: i16) {
        self.data.write_i16::<E>(v).unwrap();
    }

    pub fn u32(&mut self, v: u32) {
        self.data.write_u32::<E>(v).unwrap();
    }

    pub fn i32(&mut self, v: i32) {
        self.data.write_i32::<E>(v).unwrap();
    }

    pub fn u64(&mut self, v: u64) {
        self.data.write_u64::<E>(v).unwrap();
    }

    pub fn f32(&mut self, v: f32) {
        self.data.write_f32::<E>(v).unwrap();
    }

    pub fn bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn zeros(&mut self, count: u64) {
        self.data.resize(self.data.len() + count as usize, 0);
    }

    pub fn align(&mut self, alignment: usize) {
        while self.data.len() % alignment != 0 {
            self.data.push(0);
        }
    }

    pub fn patch_u32(&mut self, at: u32, v: u32) {
        let at = at as usize;
        E::write_u32(&mut self.data[at..at + 4], v);
    }
}

/// Deduplicating zero-terminated string blob.
#[derive(Default)]
pub struct NamePool {
    blob: Vec<u8>,
    offsets: HashMap<String, u32>,
}

impl NamePool {
    pub fn add(&mut self, name: &str) -> u32 {
        if let Some(&offset) = self.offsets.get(name) {
            return offset;
        }
        let offset = self.blob.len() as u32;
        self.blob.extend_from_slice(name.as_bytes());
        self.blob.push(0);
        self.offsets.insert(name.to_string(), offset);
        offset
    }
}

#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    UInt(i32),
    Float(f32),
    Bool(bool),
    Enum(i32),
    String(&'static str),
    Unknown(i32),
}

#[derive(Debug, Clone)]
pub struct AssetCallDef {
    pub name: String,
    pub parent: i32,
    pub params: u32,
    pub condition: u32,
}

impl AssetCallDef {
    pub fn new(name: &str, parent: i32) -> Self {
        Self {
            name: name.to_string(),
            parent,
            params: NO_OFFSET,
            condition: NO_OFFSET,
        }
    }

    pub fn params(mut self, block: u32) -> Self {
        self.params = block;
        self
    }

    pub fn condition(mut self, condition: u32) -> Self {
        self.condition = condition;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ContainerDef {
    pub kind: u32,
    pub start: i32,
    pub end: i32,
    /// Watched property name, property id, container id (kind 0 only)
    pub watch: Option<(String, i32, i32)>,
}

#[derive(Debug, Clone, Copy)]
pub struct ActionTriggerDef {
    pub guid: u32,
    pub start_frame: u32,
    pub end_frame: u32,
    pub params: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct TriggerDef {
    pub guid: u32,
    pub condition: u32,
    pub params: u32,
}

impl TriggerDef {
    pub fn new(guid: u32) -> Self {
        Self {
            guid,
            condition: 0,
            params: NO_OFFSET,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: String,
    pub is_global: bool,
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Default)]
pub struct UserDef {
    pub name: String,
    pub local_properties: Vec<String>,
    pub assets: Vec<AssetCallDef>,
    /// Defaults to storage order
    pub sorted: Option<Vec<u16>>,
    pub containers: Vec<ContainerDef>,
    pub action_slots: Vec<(String, u16, u16)>,
    pub actions: Vec<(String, u32, u32)>,
    pub action_triggers: Vec<ActionTriggerDef>,
    pub properties: Vec<PropertyDef>,
    pub property_triggers: Vec<TriggerDef>,
    pub always_triggers: Vec<TriggerDef>,
}

impl UserDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

pub struct XLinkBuilder<E> {
    pub version: u32,
    names: NamePool,
    user_params: Vec<(String, DefaultValue)>,
    asset_params: Vec<(String, DefaultValue)>,
    trigger_params: Vec<(String, DefaultValue)>,
    asset_blocks: Buf<E>,
    trigger_blocks: Buf<E>,
    direct_values: Vec<u32>,
    conditions: Buf<E>,
    local_properties: Vec<String>,
    local_enums: Vec<String>,
    users: Vec<UserDef>,
}

impl<E: ByteOrder> XLinkBuilder<E> {
    pub fn new() -> Self {
        Self {
            version: 0x21,
            names: NamePool::default(),
            user_params: Vec::new(),
            asset_params: Vec::new(),
            trigger_params: Vec::new(),
            asset_blocks: Buf::new(),
            trigger_blocks: Buf::new(),
            direct_values: Vec::new(),
            conditions: Buf::new(),
            local_properties: Vec::new(),
            local_enums: Vec::new(),
            users: Vec::new(),
        }
    }

    pub fn user_param(&mut self, name: &str, default: DefaultValue) {
        self.user_params.push((name.to_string(), default));
    }

    pub fn asset_param(&mut self, name: &str, default: DefaultValue) {
        self.asset_params.push((name.to_string(), default));
    }

    pub fn trigger_param(&mut self, name: &str, default: DefaultValue) {
        self.trigger_params.push((name.to_string(), default));
    }

    pub fn local_property(&mut self, name: &str) {
        self.local_properties.push(name.to_string());
    }

    pub fn local_enum(&mut self, name: &str) {
        self.local_enums.push(name.to_string());
    }

    /// Offset of `name` in the global name table.
    pub fn name(&mut self, name: &str) -> u32 {
        self.names.add(name)
    }

    pub fn direct_u32(&mut self, v: u32) -> u32 {
        self.direct_values.push(v);
        self.direct_values.len() as u32 - 1
    }

    pub fn direct_f32(&mut self, v: f32) -> u32 {
        self.direct_u32(v.to_bits())
    }

    /// Asset param block; returns its offset from the asset param base.
    pub fn asset_block(&mut self, mask: u64, refs: &[u32]) -> u32 {
        let offset = self.asset_blocks.len();
        self.asset_blocks.u64(mask);
        for &r in refs {
            self.asset_blocks.u32(r);
        }
        offset
    }

    /// Trigger override block; returns its offset from the trigger param base.
    pub fn trigger_block(&mut self, mask: u32, refs: &[u32]) -> u32 {
        let offset = self.trigger_blocks.len();
        self.trigger_blocks.u32(mask);
        for &r in refs {
            self.trigger_blocks.u32(r);
        }
        offset
    }

    pub fn weight_condition(&mut self, kind: u32, weight: f32) -> u32 {
        let offset = self.conditions.len();
        self.conditions.u32(kind);
        self.conditions.f32(weight);
        offset
    }

    pub fn compare_condition(
        &mut self,
        property_type: u32,
        compare_type: u32,
        value: u32,
        local_enum_index: i16,
        is_solved: bool,
        is_global: bool,
    ) -> u32 {
        let offset = self.conditions.len();
        self.conditions.u32(0);
        self.conditions.u32(property_type);
        self.conditions.u32(compare_type);
        self.conditions.u32(value);
        self.conditions.i16(local_enum_index);
        self.conditions.u8(u8::from(is_solved));
        self.conditions.u8(u8::from(is_global));
        offset
    }

    pub fn user(&mut self, user: UserDef) {
        self.users.push(user);
    }

    fn schema_bytes(&self) -> Vec<u8> {
        let mut local = NamePool::default();
        let mut records = Buf::<E>::new();
        let all = self
            .user_params
            .iter()
            .chain(&self.asset_params)
            .chain(&self.trigger_params);
        for (name, default) in all {
            records.u32(local.add(name));
            match *default {
                DefaultValue::UInt(v) => {
                    records.u32(0);
                    records.i32(v);
                }
                DefaultValue::Float(v) => {
                    records.u32(1);
                    records.f32(v);
                }
                DefaultValue::Bool(v) => {
                    records.u32(2);
                    records.i32(i32::from(v));
                }
                DefaultValue::Enum(v) => {
                    records.u32(3);
                    records.i32(v);
                }
                DefaultValue::String(s) => {
                    records.u32(4);
                    records.u32(local.add(s));
                }
                DefaultValue::Unknown(v) => {
                    records.u32(5);
                    records.i32(v);
                }
            }
        }

        let mut body = Buf::<E>::new();
        body.bytes(&records.data);
        body.bytes(&local.blob);
        body.align(4);

        let mut out = Buf::<E>::new();
        out.u32(20 + body.len());
        out.u32(self.user_params.len() as u32);
        out.u32(self.asset_params.len() as u32);
        out.u32(0);
        out.u32(self.trigger_params.len() as u32);
        out.bytes(&body.data);
        out.data
    }

    fn user_bytes(&mut self, user: &UserDef, variant: HeaderVariant) -> Vec<u8> {
        let num_call = user.assets.len() as u32;
        let num_asset = num_call - user.containers.len() as u32;

        let mut out = Buf::<E>::new();
        out.u32(0);
        out.u32(user.local_properties.len() as u32);
        out.u32(num_call);
        out.u32(num_asset);
        out.u32(0);
        out.u32(user.action_slots.len() as u32);
        out.u32(user.actions.len() as u32);
        out.u32(user.action_triggers.len() as u32);
        out.u32(user.properties.len() as u32);
        out.u32(user.property_triggers.len() as u32);
        out.u32(user.always_triggers.len() as u32);
        let trigger_table_pos = out.len();
        out.u32(0);

        for name in &user.local_properties {
            out.u32(self.names.add(name));
        }
        out.zeros(variant.user_header_skip());

        let sorted = user.sorted.clone().unwrap_or_else(|| (0..num_call as u16).collect());
        for index in sorted {
            out.u16(index);
        }
        out.align(4);

        for (i, call) in user.assets.iter().enumerate() {
            out.u32(self.names.add(&call.name));
            out.i16(i as i16);
            out.u16(0);
            out.i32(0);
            out.i32(call.parent);
            out.i32(0);
            out.u32(hash_name(&call.name));
            out.u32(call.params);
            out.u32(call.condition);
        }

        for container in &user.containers {
            out.u32(container.kind);
            out.i32(container.start);
            out.i32(container.end);
            if let Some((name, property_id, id)) = &container.watch {
                out.u32(self.names.add(name));
                out.i32(*property_id);
                out.i32(*id);
            }
        }

        let pos = out.len();
        out.patch_u32(trigger_table_pos, pos);

        for (name, start, end) in &user.action_slots {
            out.u32(self.names.add(name));
            out.u16(*start);
            out.u16(*end);
        }
        for (name, start, end) in &user.actions {
            out.u32(self.names.add(name));
            out.u32(*start);
            out.u32(*end);
        }
        for t in &user.action_triggers {
            out.u32(t.guid);
            out.u32(0);
            out.u32(t.start_frame);
            out.u32(t.end_frame);
            out.u32(0);
            out.u32(t.params);
        }
        for p in &user.properties {
            out.u32(self.names.add(&p.name));
            out.u32(u32::from(p.is_global));
            out.u32(p.start);
            out.u32(p.end);
        }
        for t in &user.property_triggers {
            out.u32(t.guid);
            out.u32(0);
            out.u32(t.condition);
            out.u32(0);
            out.u32(t.params);
        }
        for t in &user.always_triggers {
            out.u32(t.guid);
            out.u32(0);
            out.u32(0);
            out.u32(t.params);
        }

        out.data
    }

    pub fn build(mut self, variant: HeaderVariant) -> Vec<u8> {
        let schema = self.schema_bytes();

        let users = std::mem::take(&mut self.users);
        let headers: Vec<(u32, Vec<u8>)> = users
            .iter()
            .map(|user| (hash_name(&user.name), self.user_bytes(user, variant)))
            .collect();

        let mut local_refs = Buf::<E>::new();
        let local_names: Vec<String> = self.local_properties.iter().chain(&self.local_enums).cloned().collect();
        for name in &local_names {
            local_refs.u32(self.names.add(name));
        }

        let mut out = Buf::<E>::new();
        out.bytes(b"XLNK");
        out.zeros(17 * 4);

        let user_table = out.len();
        out.zeros(headers.len() as u64 * 8);

        out.bytes(&schema);
        out.bytes(&self.asset_blocks.data);
        let trigger_base = out.len();
        out.bytes(&self.trigger_blocks.data);
        let local_pos = out.len();
        out.bytes(&local_refs.data);
        for &v in &self.direct_values {
            out.u32(v);
        }
        let condition_pos = out.len();
        out.bytes(&self.conditions.data);

        let count = headers.len() as u32;
        for (i, (hash, header)) in headers.into_iter().enumerate() {
            out.align(4);
            let offset = out.len();
            out.bytes(&header);
            out.patch_u32(user_table + 4 * i as u32, hash);
            out.patch_u32(user_table + 4 * (count + i as u32), offset);
        }

        out.align(4);
        let name_pos = out.len();
        out.bytes(&self.names.blob);

        let fields = [
            out.len(),
            self.version,
            0,
            0,
            0,
            trigger_base,
            local_pos,
            self.local_properties.len() as u32,
            self.local_enums.len() as u32,
            self.direct_values.len() as u32,
            0,
            0,
            0,
            0,
            count,
            condition_pos,
            name_pos,
        ];
        for (i, v) in fields.into_iter().enumerate() {
            out.patch_u32(4 + 4 * i as u32, v);
        }

        out.data
    }
}
