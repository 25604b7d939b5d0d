//! Check the reconciliation against a brute force maximum for randomly
//! generated subscribers and randomly changing cutoffs

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use rand_xoshiro::Xoshiro256PlusPlus;
use slotmap::SlotMap;

use nlcut::{interaction::CutoffSource, neighbor::*, runtime::InteractionID, types::TypePair};

const NUM_TYPES: usize = 5;
const NUM_SOURCES: usize = 6;
const NUM_ROUNDS: usize = 50;
const RNG_SEED: u64 = 12345678910;

/// Subscriber that defines a random subset of pairs
struct RandomSource {
    default_rcut: f64,
    /// Pairs missing here are not defined, `None` means the default is used
    rcuts: HashMap<TypePair, Option<f64>>,
}

impl RandomSource {
    fn new(rng: &mut Xoshiro256PlusPlus) -> Self {
        let dist = rand_distr::Uniform::new(0.5, 5.0);
        let mut source = Self {
            default_rcut: dist.sample(rng),
            rcuts: HashMap::new(),
        };
        source.shuffle(rng);
        source
    }

    /// Redraw all per pair cutoffs
    fn shuffle(&mut self, rng: &mut Xoshiro256PlusPlus) {
        let dist = rand_distr::Uniform::new(0.5, 5.0);
        self.rcuts.clear();
        for pair in TypePair::all(NUM_TYPES) {
            match rng.gen_range(0..3) {
                0 => {},
                1 => { self.rcuts.insert(pair, None); },
                _ => { self.rcuts.insert(pair, Some(dist.sample(rng))); },
            }
        }
    }
}

impl CutoffSource for RandomSource {
    fn get_name(&self) -> &str {
        "random"
    }

    fn get_rcut(&self, pair: TypePair) -> Option<f64> {
        self.rcuts.get(&pair).map(|rcut| rcut.unwrap_or(self.default_rcut))
    }
}

type Registry = SlotMap<InteractionID, RandomSource>;

fn new_registry(rng: &mut Xoshiro256PlusPlus) -> (Registry, Vec<InteractionID>) {
    let mut registry = Registry::with_key();
    let ids = (0..NUM_SOURCES)
        .map(|_| registry.insert(RandomSource::new(rng)))
        .collect::<Vec<_>>();
    (registry, ids)
}

fn update(nlist: &mut NeighborList, registry: &Registry) {
    nlist.update_rcut(|id| registry.get(id).map(|source| source as &dyn CutoffSource), NUM_TYPES)
        .unwrap();
}

/// Maximum over the subscribers of `nlist` that define `pair`
fn brute_force(nlist: &NeighborList, registry: &Registry, pair: TypePair) -> Option<f64> {
    let mut result: Option<f64> = None;
    for id in nlist.get_subscribers() {
        if let Some(rcut) = registry[*id].get_rcut(pair) {
            result = Some(match result {
                None => rcut,
                Some(current) => if rcut > current { rcut } else { current }
            });
        }
    }
    result
}

fn verify(nlist: &NeighborList, registry: &Registry) {
    for pair in TypePair::all(NUM_TYPES) {
        let (i, j) = pair.get_types();
        match brute_force(nlist, registry, pair) {
            None => assert!(nlist.get_pair(i, j).is_err(),
                "Pair {} should be absent from neighbor list {}", pair, nlist.get_name()),
            Some(expected) => {
                assert_eq!(nlist.get_pair(i, j).unwrap(), expected);
                assert_eq!(nlist.get_pair(j, i).unwrap(), expected);
            }
        }
    }
}

#[test]
fn reconcile_random() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(RNG_SEED);
    let (mut registry, ids) = new_registry(&mut rng);

    // Split subscribers between two independent lists, both see the whole registry
    let mut nlist_a = NeighborList::new("a", &NeighborListDetails::default()).unwrap();
    let mut nlist_b = NeighborList::new("b", &NeighborListDetails::default()).unwrap();
    for (i, id) in ids.iter().enumerate() {
        if i % 2 == 0 { nlist_a.subscribe(*id); } else { nlist_b.subscribe(*id); }
    }

    for _ in 0..NUM_ROUNDS {
        update(&mut nlist_a, &registry);
        update(&mut nlist_b, &registry);
        verify(&nlist_a, &registry);
        verify(&nlist_b, &registry);

        // Recomputing without changes gives the same result
        update(&mut nlist_a, &registry);
        verify(&nlist_a, &registry);

        // Change a random subscriber
        let changed = rng.gen_range(0..NUM_SOURCES);
        registry[ids[changed]].shuffle(&mut rng);
    }
}

#[test]
fn lowering_all_contributions() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(RNG_SEED);
    let (mut registry, ids) = new_registry(&mut rng);
    let mut nlist = NeighborList::new("nl", &NeighborListDetails::default()).unwrap();
    for id in &ids {
        nlist.subscribe(*id);
    }
    update(&mut nlist, &registry);
    let before = TypePair::all(NUM_TYPES)
        .map(|pair| (pair, brute_force(&nlist, &registry, pair)))
        .collect::<HashMap<_, _>>();

    // Halve every contribution
    for (_, source) in registry.iter_mut() {
        source.default_rcut *= 0.5;
        for rcut in source.rcuts.values_mut() {
            if let Some(rcut) = rcut {
                *rcut *= 0.5;
            }
        }
    }
    update(&mut nlist, &registry);
    verify(&nlist, &registry);
    for (pair, rcut) in before {
        if let Some(rcut) = rcut {
            let (i, j) = pair.get_types();
            assert_eq!(nlist.get_pair(i, j).unwrap(), 0.5 * rcut);
        }
    }
}
