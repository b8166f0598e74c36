//! PDDL fixtures shared by the unit tests.

pub const BLOCKS_DOMAIN_TEXT: &str = r#"
;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;
;;; 4 Op-blocks world
;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;;

(define (domain blocks)
  (:requirements :strips)
  (:predicates (on ?x ?y)
               (ontable ?x)
               (clear ?x)
               (handempty)
               (holding ?x))

  (:action pick-up
       :parameters (?x)
       :precondition (and (clear ?x)
                          (ontable ?x)
                          (handempty))
       :effect (and (not (ontable ?x))
                    (not (clear ?x))
                    (not (handempty))
                    (holding ?x)))

  (:action put-down
       :parameters (?x)
       :precondition (holding ?x)
       :effect (and (not (holding ?x))
                    (clear ?x)
                    (handempty)
                    (ontable ?x)))
  (:action stack
       :parameters (?x ?y)
       :precondition (and (holding ?x)
                          (clear ?y))
       :effect (and (not (holding ?x))
                    (not (clear ?y))
                    (clear ?x)
                    (handempty)
                    (on ?x ?y)))
  (:action unstack
       :parameters (?x ?y)
       :precondition (and (on ?x ?y)
                          (clear ?x)
                          (handempty))
       :effect (and (holding ?x)
                    (clear ?y)
                    (not (clear ?x))
                    (not (handempty))
                    (not (on ?x ?y)))))
"#;

pub const BLOCKS_PROBLEM_TEXT: &str = r#"
(define (problem blocks-4-0)
    (:domain blocks)

    (:objects d b a c )

    (:init (clear c)
           (clear a)
           (clear b)
           (clear d)
           (ontable c)
           (ontable a)
           (ontable b)
           (ontable d)
           (handempty))

    (:goal (and (on d c)
                (on c b)
                (on b a)))
    )
"#;

pub const GRIPPER_DOMAIN_TEXT: &str = r#"
(define (domain gripper-strips)
   (:predicates (room ?r)
                (ball ?b)
                (gripper ?g)
                (at-robby ?r)
                (at ?b ?r)
                (free ?g)
                (carry ?o ?g))

   (:action move
       :parameters (?from ?to)
       :precondition (and (room ?from)
                          (room ?to)
                          (at-robby ?from))
       :effect (and (at-robby ?to)
                    (not (at-robby ?from))))

   (:action pick
       :parameters (?obj ?room ?gripper)
       :precondition (and (ball ?obj)
                          (room ?room)
                          (gripper ?gripper)
                          (at ?obj ?room)
                          (at-robby ?room)
                          (free ?gripper))
       :effect (and (carry ?obj ?gripper)
                    (not (at ?obj ?room))
                    (not (free ?gripper))))

   (:action drop
       :parameters (?obj ?room ?gripper)
       :precondition (and (ball ?obj)
                          (room ?room)
                          (gripper ?gripper)
                          (carry ?obj ?gripper)
                          (at-robby ?room))
       :effect (and (at ?obj ?room)
                    (free ?gripper)
                    (not (carry ?obj ?gripper)))))
"#;

pub const GRIPPER_PROBLEM_TEXT: &str = r#"
(define (problem strips-gripper-x-1)
   (:domain gripper-strips)

   (:objects rooma roomb ball4 ball3 ball2 ball1 left right)

   (:init (room rooma)
          (room roomb)
          (ball ball4)
          (ball ball3)
          (ball ball2)
          (ball ball1)
          (at-robby rooma)
          (free left)
          (free right)
          (at ball4 rooma)
          (at ball3 rooma)
          (at ball2 rooma)
          (at ball1 rooma)
          (gripper left)
          (gripper right))

   (:goal (and (at ball4 roomb)
               (at ball3 roomb)
               (at ball2 roomb)
               (at ball1 roomb))))
"#;

pub const SPANNER_DOMAIN_TEXT: &str = r#"
(define (domain spanner)
    (:requirements :typing :strips)

    (:types location locatable - object
            man nut spanner - locatable)

    (:predicates (at ?m - locatable ?l - location)
                 (carrying ?m - man ?s - spanner)
                 (useable ?s - spanner)
                 (link ?l1 - location ?l2 - location)
                 (tightened ?n - nut)
                 (loose ?n - nut))

    (:action walk
            :parameters (?start - location ?end - location ?m - man)
            :precondition (and (at ?m ?start)
                               (link ?start ?end))
            :effect (and (not (at ?m ?start))
                         (at ?m ?end)))

    (:action pickup_spanner
            :parameters (?l - location ?s - spanner ?m - man)
            :precondition (and (at ?m ?l)
                               (at ?s ?l))
            :effect (and (not (at ?s ?l))
                         (carrying ?m ?s)))

    (:action tighten_nut
            :parameters (?l - location ?s - spanner ?m - man ?n - nut)
            :precondition (and (at ?m ?l)
                               (at ?n ?l)
                               (carrying ?m ?s)
                               (useable ?s)
                               (loose ?n))
            :effect (and (not (loose ?n))
                         (not (useable ?s))
                         (tightened ?n))))
"#;

pub const SPANNER_PROBLEM_TEXT: &str = r#"
(define (problem prob)
    (:domain spanner)

    (:objects bob - man
              spanner1 - spanner
              nut1 - nut
              location1 location2 location3 - location
              shed gate - location)

    (:init (at bob shed)
           (at spanner1 location3)
           (useable spanner1)
           (loose nut1)
           (at nut1 gate)
           (link shed location1)
           (link location3 gate)
           (link location1 location2)
           (link location2 location3))

    (:goal (and (tightened nut1))))
"#;

/// A briefcase-style domain exercising conditional effects: moving the
/// briefcase carries exactly the objects inside it.
pub const BRIEFCASE_DOMAIN_TEXT: &str = r#"
(define (domain briefcase)
    (:requirements :strips :typing :conditional-effects)

    (:types location physob)

    (:predicates (at-bc ?l - location)
                 (at ?x - physob ?l - location)
                 (in ?x - physob))

    (:action move-briefcase
            :parameters (?from - location ?to - location)
            :precondition (at-bc ?from)
            :effect (and (not (at-bc ?from))
                         (at-bc ?to)
                         (when (in pencil) (and (not (at pencil ?from)) (at pencil ?to)))
                         (when (in book) (and (not (at book ?from)) (at book ?to)))))

    (:action put-in
            :parameters (?x - physob ?l - location)
            :precondition (and (at ?x ?l) (at-bc ?l))
            :effect (in ?x))

    (:action take-out
            :parameters (?x - physob)
            :precondition (in ?x)
            :effect (not (in ?x))))
"#;

pub const BRIEFCASE_PROBLEM_TEXT: &str = r#"
(define (problem briefcase-1)
    (:domain briefcase)

    (:objects home office - location
              pencil book - physob)

    (:init (at-bc home)
           (at pencil home)
           (at book home)
           (in pencil))

    (:goal (and (at pencil office))))
"#;

/// A trucking domain exercising `:action-costs` with function-valued costs.
pub const DELIVERY_DOMAIN_TEXT: &str = r#"
(define (domain delivery)
    (:requirements :strips :typing :action-costs)

    (:types place)

    (:predicates (at-truck ?p - place)
                 (connected ?a - place ?b - place))

    (:functions (total-cost)
                (distance ?a - place ?b - place))

    (:action drive
            :parameters (?a - place ?b - place)
            :precondition (and (at-truck ?a) (connected ?a ?b))
            :effect (and (not (at-truck ?a))
                         (at-truck ?b)
                         (increase (total-cost) (distance ?a ?b)))))
"#;

pub const DELIVERY_PROBLEM_TEXT: &str = r#"
(define (problem delivery-1)
    (:domain delivery)

    (:objects depot shop harbour - place)

    (:init (at-truck depot)
           (connected depot shop)
           (connected shop harbour)
           (connected depot harbour)
           (= (distance depot shop) 2)
           (= (distance shop harbour) 2)
           (= (distance depot harbour) 5)
           (= (total-cost) 0))

    (:goal (at-truck harbour))
    (:metric minimize (total-cost)))
"#;
