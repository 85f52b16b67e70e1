//! CLI command for summarising XLink files

use std::path::PathBuf;

use super::DecodeArgs;
use crate::formats::xlink::{ParamDefine, XLinkDocument};

pub fn execute(files: &[PathBuf], decode: &DecodeArgs, schema: bool) -> anyhow::Result<()> {
    for (i, file) in files.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let doc = decode.decode(file)?;
        println!("{}", file.display());
        print_summary(&doc);
        if schema {
            print_schema("User params", &doc.schema.user_params);
            print_schema("Asset params", &doc.schema.asset_params);
            print_schema("Trigger params", &doc.schema.trigger_params);
        }
    }
    Ok(())
}

fn print_summary(doc: &XLinkDocument) {
    let header = &doc.header;
    println!("  Version:           {}", header.version);
    println!("  File size:         {}", header.file_size);
    println!("  Users:             {}", header.num_user);
    println!("  Local properties:  {}", doc.local_property_names.len());
    println!("  Local enums:       {}", doc.local_enum_names.len());
    println!("  Direct values:     {}", header.num_direct_value_table);
    println!("  Random tables:     {}", header.num_random_table);
    println!("  Curves:            {} ({} points)", header.num_curve_table, header.num_curve_point_table);

    if doc.entries.is_empty() {
        return;
    }
    println!();
    println!("  {:<32} {:>10} {:>7} {:>6} {:>10} {:>8}", "Entry", "Hash", "Assets", "Slots", "Properties", "Triggers");
    for entry in &doc.entries {
        println!(
            "  {:<32} {:>10} {:>7} {:>6} {:>10} {:>8}",
            entry.name,
            entry.hash,
            entry.asset_count(),
            entry.action_slots.len(),
            entry.properties.len(),
            entry.trigger_count()
        );
    }
}

fn print_schema(title: &str, fields: &[ParamDefine]) {
    println!();
    println!("  {} ({}):", title, fields.len());
    for (i, field) in fields.iter().enumerate() {
        println!("    {i:>3}  {:<32} {:<8} {}", field.name, field.param_type.name(), field.default_value);
    }
}
