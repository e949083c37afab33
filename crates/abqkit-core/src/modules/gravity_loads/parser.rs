use crate::domain::{AbqError, ParserResult};
use crate::inp::{InpLine, first_data_value, is_marker_comment};
use std::collections::BTreeMap;

pub(super) const OUTPUT_REQUESTS_MARKER: &str = "OUTPUT REQUESTS";

/// What the load block needs from a model: instance, set/material pairs and
/// material densities, plus where the block goes.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct ModelInventory {
    pub(super) instance_name: Option<String>,
    pub(super) set_materials: BTreeMap<String, String>,
    pub(super) material_densities: BTreeMap<String, f64>,
    pub(super) marker_line: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SetLoad<'a> {
    pub(super) set_name: &'a str,
    pub(super) density: f64,
}

impl ModelInventory {
    pub(super) fn set_loads(&self) -> ParserResult<Vec<SetLoad<'_>>> {
        self.set_materials
            .iter()
            .map(|(set_name, material)| {
                self.density_of(material)
                    .map(|density| SetLoad {
                        set_name: set_name.as_str(),
                        density,
                    })
                    .ok_or_else(|| {
                        AbqError::input_validation(
                            "INPUT.LOADS_DENSITY",
                            format!(
                                "set '{}' uses material '{}', which has no *Density",
                                set_name, material
                            ),
                        )
                    })
            })
            .collect()
    }

    fn density_of(&self, material: &str) -> Option<f64> {
        self.material_densities.get(material).copied().or_else(|| {
            self.material_densities
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(material))
                .map(|(_, density)| *density)
        })
    }
}

pub(super) fn parse_model_inventory(source: &str) -> ParserResult<ModelInventory> {
    let mut inventory = ModelInventory::default();
    let mut current_material: Option<String> = None;
    let mut awaiting_density = false;

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        if inventory.marker_line.is_none() && is_marker_comment(line, OUTPUT_REQUESTS_MARKER) {
            inventory.marker_line = Some(index);
        }

        match InpLine::classify(line) {
            InpLine::Keyword(keyword) => {
                awaiting_density = false;
                if keyword.is("INSTANCE") {
                    inventory.instance_name = keyword.parameter("name").map(str::to_string);
                } else if keyword.is("SOLID SECTION") {
                    let set_name = keyword.parameter("elset");
                    let material = keyword.parameter("material");
                    match (set_name, material) {
                        (Some(set_name), Some(material)) => {
                            inventory
                                .set_materials
                                .insert(set_name.to_string(), material.to_string());
                        }
                        _ => {
                            return Err(AbqError::input_validation(
                                "INPUT.LOADS_SECTION",
                                format!(
                                    "*Solid Section on line {} needs both elset= and material=",
                                    line_number
                                ),
                            ));
                        }
                    }
                } else if keyword.is("MATERIAL") {
                    current_material = keyword.parameter("name").map(str::to_string);
                } else if keyword.is("DENSITY") {
                    if current_material.is_none() {
                        return Err(AbqError::input_validation(
                            "INPUT.LOADS_DENSITY",
                            format!("*Density on line {} is outside any *Material", line_number),
                        ));
                    }
                    // densities after the output requests do not feed the loads
                    awaiting_density = inventory.marker_line.is_none();
                }
            }
            InpLine::Data(data) if awaiting_density => {
                awaiting_density = false;
                let density = first_data_value(data).ok_or_else(|| {
                    AbqError::input_validation(
                        "INPUT.LOADS_DENSITY",
                        format!("line {}: '{}' is not a density value", line_number, data),
                    )
                })?;
                if let Some(material) = &current_material {
                    inventory
                        .material_densities
                        .insert(material.clone(), density);
                }
            }
            _ => {}
        }
    }

    Ok(inventory)
}
