//! Parse throughput benchmarks over representative MOO sources.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

const VERB_CODE: &str = r#"
let {what, ?how = 'calm, @rest} = args;
if (!valid(what))
  return E_INVARG;
elseif (what.wizard)
  return E_PERM;
endif
let total = 0;
for i in [1..100]
  total = total + i * i;
endfor
for dude in (connected_players())
  `dude:tell("tick ", total) ! E_VERBNF, E_PERM => 0';
endfor
while watchdog (total > 0)
  total = total / 2;
  if (total % 2)
    continue watchdog;
  endif
endwhile
fork (60)
  $housekeeper:sweep(@rest);
endfork
return {total, what, how};
"#;

const OBJDEF: &str = r#"
object widget
  parent: #1
  location: #-1
  name: "a widget"
  property weight (owner: #2) = 10;
  property tags = {'shiny, 'small};
  verb "l*ook examine" (this none none)
    dobj: "this"
    let desc = `this.description ! E_PROPNF => "nothing special"';
    player:tell(desc);
  endverb
  verb poll (none none none)
    for p in (this.watchers)
      p:notify(this);
    endfor
  endverb
endobject
"#;

fn parse_checked(source: &str) {
    moo::parse(source).expect("benchmark source must parse");
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_verb_code", |b| {
        b.iter(|| parse_checked(black_box(VERB_CODE)))
    });
    c.bench_function("parse_objdef", |b| {
        b.iter(|| parse_checked(black_box(OBJDEF)))
    });

    let large: String = VERB_CODE.repeat(50);
    c.bench_function("parse_verb_code_x50", |b| {
        b.iter(|| parse_checked(black_box(&large)))
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
