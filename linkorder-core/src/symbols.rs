use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;

use crate::archive::SymbolReader;
use crate::domain::{DefinedSymbol, LibInfo, SymbolTable, UndefinedSymbol};
use crate::error::{DepFindError, Result};

struct Owner {
    lib: LibInfo,
    weak: bool,
}

/// Build the defined/undefined lookup tables for `libs`.
///
/// A symbol belongs to the first library that defines it strongly; a weak
/// definition only holds it until a strong one shows up. Two strong
/// definitions of a symbol nobody references are tolerated, otherwise they
/// are reported as `MultipleDefines`.
pub fn generate_lookup_tables<I, R>(libs: I, reader: &R, strict: bool) -> Result<SymbolTable>
where
    I: IntoIterator<Item = LibInfo>,
    R: SymbolReader + ?Sized,
{
    let mut owners: HashMap<DefinedSymbol, Owner> = HashMap::new();
    let mut undefined_table: Vec<(UndefinedSymbol, LibInfo)> = vec![];
    let mut referenced: HashSet<DefinedSymbol> = HashSet::new();
    let mut duplicates: Vec<(DefinedSymbol, LibInfo, LibInfo)> = vec![];

    for lib in libs {
        let symbols = match reader.read_symbols(&lib) {
            Ok(symbols) => symbols,
            Err(e) if strict => return Err(e.into()),
            Err(e) => {
                log::warn!("Treating {} as empty: {}", lib.name, e);
                continue;
            }
        };

        for definition in symbols.defined {
            match owners.entry(definition.symbol) {
                Entry::Vacant(slot) => {
                    slot.insert(Owner {
                        lib: lib.clone(),
                        weak: definition.weak,
                    });
                }
                Entry::Occupied(mut slot) => {
                    let symbol = slot.key().clone();
                    let owner = slot.get_mut();
                    if owner.lib == lib {
                        owner.weak &= definition.weak;
                        continue;
                    }
                    if definition.weak {
                        continue;
                    }
                    if owner.weak {
                        owner.lib = lib.clone();
                        owner.weak = false;
                    } else {
                        duplicates.push((symbol, owner.lib.clone(), lib.clone()));
                    }
                }
            }
        }

        for symbol in symbols.undefined {
            referenced.insert(DefinedSymbol::from(&symbol));
            undefined_table.push((symbol, lib.clone()));
        }
    }

    if let Some((symbol, first, second)) = duplicates
        .into_iter()
        .find(|(symbol, _, _)| referenced.contains(symbol))
    {
        return Err(DepFindError::MultipleDefines {
            dependency_a: first.name,
            dependency_b: second.name,
            symbol,
        }
        .into());
    }

    Ok(SymbolTable {
        defined: owners
            .into_iter()
            .map(|(symbol, owner)| (symbol, owner.lib))
            .collect(),
        undefined: undefined_table,
    })
}
